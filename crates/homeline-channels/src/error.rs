//! Error types for homeline-channels

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum Error {
    /// Twilio API rejected the request
    #[error("twilio error: {0}")]
    Twilio(String),

    /// Webhook payload could not be decoded
    #[error("message parsing error: {0}")]
    Parse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Missing or invalid channel settings
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for homeline_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Configuration(msg) => Self::Configuration(msg),
            other => Self::Sms(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error() {
        let core: homeline_core::Error = Error::Twilio("21211 invalid To".to_string()).into();
        assert!(matches!(core, homeline_core::Error::Sms(_)));
        assert_eq!(core.to_string(), "sms error: twilio error: 21211 invalid To");

        let core: homeline_core::Error = Error::Configuration("no sid".to_string()).into();
        assert!(matches!(core, homeline_core::Error::Configuration(_)));
    }
}
