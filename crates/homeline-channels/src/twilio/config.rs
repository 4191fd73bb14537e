//! Twilio account settings

use crate::error::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Twilio REST API base
pub const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Twilio configuration
#[derive(Clone)]
pub struct TwilioConfig {
    /// Account SID (starts with "AC")
    pub account_sid: String,
    /// Auth token
    pub auth_token: SecretString,
    /// Sending number in E.164 form
    pub from_number: String,
    /// API base URL
    pub api_base: String,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl TwilioConfig {
    /// Create a config against the public API
    #[must_use]
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: SecretString::from(auth_token.into()),
            from_number: from_number.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Use a different API base (test servers, regional edges)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Check that every field is present
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.account_sid.trim().is_empty() {
            return Err(Error::Configuration("sms.account_sid is not set".to_string()));
        }
        if self.auth_token.expose_secret().trim().is_empty() {
            return Err(Error::Configuration("TWILIO_AUTH_TOKEN is not set".to_string()));
        }
        if self.from_number.trim().is_empty() {
            return Err(Error::Configuration("sms.from_number is not set".to_string()));
        }
        Ok(())
    }

    /// Messages resource URL for this account
    #[must_use]
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let config = TwilioConfig::new("AC123", "tok", "+15550009999");
        assert_eq!(
            config.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );

        let config = config.with_api_base("http://localhost:4010/");
        assert_eq!(
            config.messages_url(),
            "http://localhost:4010/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_validate() {
        assert!(TwilioConfig::new("AC123", "tok", "+15550009999").validate().is_ok());

        let err = TwilioConfig::new("AC123", "", "+15550009999")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("TWILIO_AUTH_TOKEN"));

        let err = TwilioConfig::new("", "tok", "+15550009999")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("account_sid"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TwilioConfig::new("AC123", "super-secret-token", "+15550009999");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
    }
}
