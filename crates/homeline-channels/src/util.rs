//! Logging and length helpers shared by the SMS adapter

pub use homeline_core::utils::{mask_for_logging, mask_phone};

/// Twilio's limit on a single message body, in characters
pub const SMS_MESSAGE_LIMIT: usize = 1600;

/// Cut `text` to at most `limit` characters
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_sms_limit_truncation_is_maskable() {
        let long = "x".repeat(SMS_MESSAGE_LIMIT + 10);
        let text = truncate_chars(&long, SMS_MESSAGE_LIMIT);
        assert_eq!(text.chars().count(), SMS_MESSAGE_LIMIT);
        assert!(mask_for_logging(text).ends_with("...[truncated]"));
    }
}
