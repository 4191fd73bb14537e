//! Outbound SMS seam

use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Delivers one text message to one phone number
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send `body` to `to`, returning the provider's message id
    async fn send(&self, to: &str, body: &str) -> Result<String>;
}

/// Sender that only logs, used when no SMS provider is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<String> {
        info!(to = %to, chars = body.chars().count(), "SMS delivery disabled, message logged only");
        Ok("logged".to_string())
    }
}
