//! Planner configuration

use super::prompt::{validate_template, DEFAULT_TEMPLATE};
use crate::error::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Default model identifier
pub const DEFAULT_MODEL: &str = homeline_llm::openai::DEFAULT_MODEL;

/// Default upper bound on actions per planner response
pub const DEFAULT_MAX_ACTIONS: usize = 3;

/// Default planner call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the planner
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Instruction template with `{history}` and `{input}` placeholders
    pub template: String,
    /// Model identifier passed to the provider
    pub model: String,
    /// Sampling temperature (0 = deterministic)
    pub temperature: f32,
    /// Maximum tokens for the completion
    pub max_tokens: Option<u32>,
    /// Upper bound on a single planner call
    pub timeout: Duration,
    /// Array entries past this count are dropped by the dispatcher
    pub max_actions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout: DEFAULT_TIMEOUT,
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the action cap
    #[must_use]
    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    /// Replace the template
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if a placeholder is missing.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        validate_template(&template)?;
        self.template = template;
        Ok(self)
    }

    /// Replace the template with the contents of a file
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the file cannot be read or is
    /// missing a placeholder.
    pub fn with_template_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let template = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "cannot read planner template {}: {e}",
                path.display()
            ))
        })?;
        self.with_template(template)
    }
}
