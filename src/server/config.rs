//! Server configuration types
//!
//! Contains all configuration structures for the Homeline server. Every
//! section has defaults so a partial file (or none) still deserializes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub planner: PlannerSettings,
    pub openai: OpenAiSettings,
    pub sms: SmsConfig,
    pub calendar: CalendarSettings,
    pub secondary_agent: SecondaryAgentSettings,
    pub logging: LoggingConfig,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// History store connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `redis://`, `rediss://`, `sqlite:` or `memory://` URL
    pub url: String,
    /// Key prefix for Redis lists
    pub key_prefix: Option<String>,
}

/// Planner model and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Array entries acted on per message
    pub max_actions: usize,
    /// Replaces the built-in prompt; must contain `{history}` and `{input}`
    pub template_path: Option<PathBuf>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            model: homeline_core::planner::DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            timeout_secs: homeline_core::planner::DEFAULT_TIMEOUT.as_secs(),
            max_actions: homeline_core::planner::DEFAULT_MAX_ACTIONS,
            template_path: None,
        }
    }
}

impl PlannerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// OpenAI endpoint overrides (the key comes from `OPENAI_API_KEY`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiSettings {
    pub base_url: Option<String>,
}

/// Outbound SMS delivery
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    Twilio,
    /// Log messages instead of sending them
    #[default]
    Log,
}

/// SMS settings (the auth token comes from `TWILIO_AUTH_TOKEN`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub provider: SmsProvider,
    pub account_sid: String,
    pub from_number: String,
    /// Realtor's number for escalations
    pub operator_number: String,
}

impl SmsConfig {
    pub fn operator_number(&self) -> Option<String> {
        let number = self.operator_number.trim();
        (!number.is_empty()).then(|| number.to_string())
    }
}

/// Google Calendar booking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub enabled: bool,
    pub calendar_id: String,
    pub service_account_path: PathBuf,
    pub timezone: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            calendar_id: "primary".to_string(),
            service_account_path: PathBuf::from("config/service_account.json"),
            timezone: "UTC".to_string(),
        }
    }
}

/// Second model for "AI-Team" queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryAgentSettings {
    pub enabled: bool,
    pub model: String,
}

impl Default for SecondaryAgentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging sinks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Also write a daily rolling file here
    pub directory: Option<PathBuf>,
}
