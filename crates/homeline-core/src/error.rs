//! Error types for homeline-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing connection string, bad template, ...)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// History store error
    #[error("store error: {0}")]
    Store(String),

    /// LLM provider error
    #[error("llm error: {0}")]
    Llm(#[from] homeline_llm::Error),

    /// SMS delivery error
    #[error("sms error: {0}")]
    Sms(String),

    /// Calendar provider error
    #[error("calendar error: {0}")]
    Calendar(String),

    /// Internal error (serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
