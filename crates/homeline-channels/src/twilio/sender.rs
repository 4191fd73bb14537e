//! Outbound SMS through the Messages resource

use super::TwilioConfig;
use crate::error::{Error, Result};
use crate::util::{mask_for_logging, mask_phone, truncate_chars, SMS_MESSAGE_LIMIT};
use async_trait::async_trait;
use homeline_core::SmsSender;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code: Some(code),
            message,
        }) => format!("{status} ({code}): {message}"),
        Ok(ApiError { code: None, message }) => format!("{status}: {message}"),
        Err(_) => format!("{status}"),
    }
}

/// Twilio SMS sender
pub struct TwilioSender {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioSender {
    /// Create a sender
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if a setting is missing.
    pub fn new(config: TwilioConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        info!(from = %mask_phone(&config.from_number), "Twilio SMS sender initialized");
        Ok(Self { config, client })
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &TwilioConfig {
        &self.config
    }

    /// Send `body` to `to`, returning the message SID
    ///
    /// # Errors
    ///
    /// Returns `Error::Network` on transport failure and `Error::Twilio`
    /// when the API rejects the message.
    #[instrument(skip(self, to, body), fields(to = %mask_phone(to)))]
    pub async fn send_sms(&self, to: &str, body: &str) -> Result<String> {
        let text = truncate_chars(body, SMS_MESSAGE_LIMIT);
        if text.len() < body.len() {
            warn!(limit = SMS_MESSAGE_LIMIT, "Message truncated to SMS limit");
        }
        debug!(text = %mask_for_logging(text), "Sending SMS");

        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(
                &self.config.account_sid,
                Some(self.config.auth_token.expose_secret()),
            )
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", text),
            ])
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Twilio(describe_failure(status, &payload)));
        }

        let message: MessageResource = serde_json::from_str(&payload)
            .map_err(|e| Error::Twilio(format!("invalid API response: {e}")))?;

        debug!(sid = %message.sid, status = ?message.status, "SMS accepted");
        Ok(message.sid)
    }
}

#[async_trait]
impl SmsSender for TwilioSender {
    async fn send(&self, to: &str, body: &str) -> homeline_core::Result<String> {
        Ok(self.send_sms(to, body).await?)
    }
}
