//! Utility modules for homeline-core
//!
//! - redact: masking of message text and phone numbers for logs

mod redact;

pub use redact::{mask_for_logging, mask_phone, MAX_LOG_TEXT_LENGTH, SENSITIVE_PATTERNS};
