//! notify-client executor

use super::{ActionContext, ActionExecutor, SmsSender};
use crate::actions::ActionKind;
use crate::error::Result;
use crate::utils::mask_phone;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Texts the planner's reply back to the session's phone number
pub struct ClientNotifier {
    sender: Arc<dyn SmsSender>,
}

impl ClientNotifier {
    /// Create a notifier over `sender`
    #[must_use]
    pub fn new(sender: Arc<dyn SmsSender>) -> Self {
        Self { sender }
    }

    /// Confirmation string for a client reply
    #[must_use]
    pub fn confirmation(message: &str) -> String {
        format!("Sending sms to client: {message}")
    }
}

#[async_trait]
impl ActionExecutor for ClientNotifier {
    fn kind(&self) -> ActionKind {
        ActionKind::ClientReply
    }

    async fn execute(&self, ctx: &ActionContext, payload: &str) -> Result<Vec<String>> {
        let message_id = self.sender.send(&ctx.session_key, payload).await?;
        debug!(session_key = %mask_phone(&ctx.session_key), message_id = %message_id, "Client reply sent");
        Ok(vec![Self::confirmation(payload)])
    }
}
