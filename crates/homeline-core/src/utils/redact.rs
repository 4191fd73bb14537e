//! Log redaction
//!
//! Message bodies and phone numbers are customer data. Everything logged
//! outside the raw webhook dump goes through these helpers.

/// Maximum number of characters of message text to log
pub const MAX_LOG_TEXT_LENGTH: usize = 50;

/// Patterns that indicate potentially sensitive content
pub const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "bearer",
    "credential",
    "ssn",
    "social security",
    "-----begin",
];

/// Mask potentially sensitive text for logging
///
/// # Examples
/// ```
/// use homeline_core::utils::mask_for_logging;
///
/// assert!(mask_for_logging("my password is hunter2").contains("REDACTED"));
/// assert_eq!(mask_for_logging("Is 12 Elm St available?"), "Is 12 Elm St available?");
/// ```
#[must_use]
pub fn mask_for_logging(text: &str) -> String {
    let lower = text.to_lowercase();

    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "[REDACTED - potentially sensitive content]".to_string();
    }

    if text.chars().count() > MAX_LOG_TEXT_LENGTH {
        let head: String = text.chars().take(MAX_LOG_TEXT_LENGTH).collect();
        format!("{head}...[truncated]")
    } else {
        text.to_string()
    }
}

/// Mask a phone number down to its last four digits
///
/// ```
/// use homeline_core::utils::mask_phone;
///
/// assert_eq!(mask_phone("+15550001234"), "***1234");
/// ```
#[must_use]
pub fn mask_phone(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 4 {
        return "***".to_string();
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("***{tail}")
}
