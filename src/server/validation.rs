//! Startup configuration validation
//!
//! Hard errors for settings the server cannot run with, plus security
//! warnings for production deployments.

use super::config::{AppConfig, SmsProvider};
use super::loader::is_production;
use anyhow::{bail, Result};
use tracing::warn;

/// Reject configurations that cannot work
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.store.url.trim().is_empty() {
        bail!("store.url is not set (HOMELINE_STORE__URL)");
    }
    if is_production() && config.store.url.trim().starts_with("memory://") {
        bail!("store.url = \"memory://\" loses history on restart and is not allowed in production");
    }
    if config.planner.max_actions == 0 {
        bail!("planner.max_actions must be at least 1");
    }
    if config.planner.timeout_secs == 0 {
        bail!("planner.timeout_secs must be at least 1");
    }
    if config.sms.provider == SmsProvider::Twilio {
        if config.sms.account_sid.trim().is_empty() {
            bail!("sms.account_sid is required when sms.provider = \"twilio\"");
        }
        if config.sms.from_number.trim().is_empty() {
            bail!("sms.from_number is required when sms.provider = \"twilio\"");
        }
    }
    if config.calendar.enabled && config.calendar.calendar_id.trim().is_empty() {
        bail!("calendar.calendar_id is required when the calendar is enabled");
    }
    Ok(())
}

/// Validate configuration for production security
pub fn validate_production_config(config: &AppConfig) -> Result<()> {
    if !is_production() {
        return Ok(());
    }

    if config.server.host == "0.0.0.0" {
        warn!(
            "SECURITY WARNING: Server is binding to all interfaces (0.0.0.0) in production. \
             Consider binding to 127.0.0.1 and using a reverse proxy."
        );
    }

    if config.store.url.starts_with("redis://") && !config.store.url.contains('@') {
        warn!(
            "SECURITY WARNING: Redis connection appears to have no authentication in production. \
             Consider enabling Redis AUTH."
        );
    }

    if config.sms.provider == SmsProvider::Log {
        warn!("sms.provider is \"log\" in production: clients will not receive replies");
    }

    if config.sms.operator_number().is_none() {
        warn!("sms.operator_number is not set: realtor escalations are only logged");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.url = "memory://".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_missing_store_url() {
        let mut config = valid();
        config.store.url = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("store.url"));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = valid();
        config.planner.max_actions = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid();
        config.planner.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_twilio_requires_account() {
        let mut config = valid();
        config.sms.provider = SmsProvider::Twilio;
        assert!(validate_config(&config).is_err());

        config.sms.account_sid = "AC123".to_string();
        config.sms.from_number = "+15550009999".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
