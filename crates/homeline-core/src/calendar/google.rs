//! Google Calendar v3 client authenticated with a service-account key
//!
//! Flow: sign an RS256 JWT assertion with the key's private key, exchange
//! it at the key's token endpoint for a bearer token, then insert events.
//! Tokens are cached until shortly before they expire.

use super::{CalendarClient, CalendarEvent};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// OAuth scope for calendar writes
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3/";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCalendarConfig {
    /// Target calendar ("primary" or a calendar address)
    pub calendar_id: String,
    /// Path to the service-account JSON key
    pub service_account_path: PathBuf,
    /// Time zone events are created in
    pub timezone: String,
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl GoogleCalendarConfig {
    /// Create a config with the default API base
    #[must_use]
    pub fn new(
        calendar_id: impl Into<String>,
        service_account_path: impl Into<PathBuf>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            service_account_path: service_account_path.into(),
            timezone: timezone.into(),
            api_base: default_api_base(),
        }
    }
}

/// The fields of a service-account key file this client needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account address, used as the JWT issuer
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct InsertedEvent {
    id: String,
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Google Calendar client
pub struct GoogleCalendarClient {
    config: GoogleCalendarConfig,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleCalendarClient {
    /// Load the service-account key named in `config`
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the key file is missing or invalid.
    pub fn from_config(config: GoogleCalendarConfig) -> Result<Self> {
        let raw = std::fs::read_to_string(&config.service_account_path).map_err(|e| {
            Error::Configuration(format!(
                "cannot read service account key {}: {e}",
                config.service_account_path.display()
            ))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| Error::Configuration(format!("invalid service account key: {e}")))?;
        Self::with_key(config, key)
    }

    /// Build a client from an already parsed key
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the private key is not RSA PEM.
    pub fn with_key(config: GoogleCalendarConfig, key: ServiceAccountKey) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| Error::Configuration(format!("invalid service account private key: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("failed to build HTTP client: {e}")))?;

        info!(calendar_id = %config.calendar_id, account = %key.client_email, "Google Calendar client initialized");

        Ok(Self {
            config,
            key,
            signing_key,
            http,
            token: Mutex::new(None),
        })
    }

    /// Events collection URL for the configured calendar
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the API base is not a usable URL.
    pub fn events_url(&self) -> Result<Url> {
        events_url(&self.config.api_base, &self.config.calendar_id)
    }

    fn sign_assertion(&self, now: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CALENDAR_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| Error::Calendar(format!("failed to sign assertion: {e}")))
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - TOKEN_REFRESH_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| Error::Calendar(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Calendar(format!("token exchange returned {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Calendar(format!("invalid token response: {e}")))?;

        debug!(expires_in = token.expires_in, "Calendar access token refreshed");
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: now + token.expires_in,
        });
        Ok(value)
    }
}

fn events_url(api_base: &str, calendar_id: &str) -> Result<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| Error::Configuration(format!("invalid calendar api base: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| Error::Configuration(format!("calendar api base cannot be a base: {api_base}")))?
        .pop_if_empty()
        .extend(["calendars", calendar_id, "events"]);
    Ok(url)
}

fn event_body(event: &CalendarEvent) -> serde_json::Value {
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    serde_json::json!({
        "summary": event.summary,
        "start": { "dateTime": event.start.format(FORMAT).to_string(), "timeZone": event.timezone },
        "end": { "dateTime": event.end.format(FORMAT).to_string(), "timeZone": event.timezone },
    })
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    #[instrument(skip(self, event), fields(calendar_id = %self.config.calendar_id))]
    async fn create_event(&self, event: &CalendarEvent) -> Result<String> {
        let token = self.access_token().await?;
        let url = self.events_url()?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&event_body(event))
            .send()
            .await
            .map_err(|e| Error::Calendar(format!("event insert failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Calendar(format!("event insert returned {status}: {body}")));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| Error::Calendar(format!("invalid event response: {e}")))?;

        info!(event_id = %inserted.id, "Calendar event created");
        Ok(inserted.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_events_url_escapes_calendar_id() {
        let url = events_url(DEFAULT_API_BASE, "team@group.calendar.google.com").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team@group.calendar.google.com/events"
        );

        let url = events_url("https://calendar.test/v3", "a/b").unwrap();
        assert_eq!(url.as_str(), "https://calendar.test/v3/calendars/a%2Fb/events");
    }

    #[test]
    fn test_events_url_rejects_garbage() {
        assert!(matches!(
            events_url("not a url", "primary"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_event_body_shape() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let event = CalendarEvent {
            summary: "Appointment".to_string(),
            start,
            end: start + chrono::Duration::hours(1),
            timezone: "UTC".to_string(),
        };

        let body = event_body(&event);
        assert_eq!(body["summary"], "Appointment");
        assert_eq!(body["start"]["dateTime"], "2024-01-07T10:00:00");
        assert_eq!(body["end"]["dateTime"], "2024-01-07T11:00:00");
        assert_eq!(body["end"]["timeZone"], "UTC");
    }

    #[test]
    fn test_key_file_errors_are_configuration_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = GoogleCalendarConfig::new("primary", dir.path().join("nope.json"), "UTC");
        assert!(matches!(
            GoogleCalendarClient::from_config(missing),
            Err(Error::Configuration(_))
        ));

        let path = dir.path().join("key.json");
        std::fs::write(
            &path,
            r#"{"client_email":"svc@example.iam.gserviceaccount.com","private_key":"not a pem"}"#,
        )
        .unwrap();
        let bad_pem = GoogleCalendarConfig::new("primary", &path, "UTC");
        assert!(matches!(
            GoogleCalendarClient::from_config(bad_pem),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_key_debug_redacts_private_key() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email":"svc@example.iam.gserviceaccount.com","private_key":"-----BEGIN secret"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
        let debug = format!("{key:?}");
        assert!(!debug.contains("BEGIN"));
        assert!(debug.contains("[REDACTED]"));
    }
}
