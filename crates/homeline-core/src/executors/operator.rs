//! notify-human-operator executor

use super::{ActionContext, ActionExecutor, SmsSender};
use crate::actions::ActionKind;
use crate::error::Result;
use crate::utils::mask_phone;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Escalates to the realtor on the configured operator number
pub struct OperatorNotifier {
    sender: Arc<dyn SmsSender>,
    operator_number: Option<String>,
}

impl OperatorNotifier {
    /// Create a notifier; without an operator number alerts are only logged
    #[must_use]
    pub fn new(sender: Arc<dyn SmsSender>, operator_number: Option<String>) -> Self {
        Self {
            sender,
            operator_number: operator_number.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Confirmation string for an operator alert
    #[must_use]
    pub fn confirmation(message: &str) -> String {
        format!("Sending sms to realtor: {message}")
    }
}

#[async_trait]
impl ActionExecutor for OperatorNotifier {
    fn kind(&self) -> ActionKind {
        ActionKind::OperatorAlert
    }

    async fn execute(&self, ctx: &ActionContext, payload: &str) -> Result<Vec<String>> {
        match &self.operator_number {
            Some(number) => {
                let body = format!("[{}] {payload}", ctx.session_key);
                let message_id = self.sender.send(number, &body).await?;
                info!(session_key = %mask_phone(&ctx.session_key), message_id = %message_id, "Operator alerted");
            }
            None => {
                warn!(session_key = %mask_phone(&ctx.session_key), "No operator number configured, alert logged only");
            }
        }
        Ok(vec![Self::confirmation(payload)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::MockSmsSender;

    #[tokio::test]
    async fn test_alert_goes_to_operator_with_client_tag() {
        let mut sender = MockSmsSender::new();
        sender
            .expect_send()
            .withf(|to, body| to == "+15559990000" && body == "[+15550001111] Escalate now")
            .times(1)
            .returning(|_, _| Ok("SM2".to_string()));

        let notifier = OperatorNotifier::new(Arc::new(sender), Some("+15559990000".to_string()));
        let out = notifier
            .execute(&ActionContext::new("+15550001111"), "Escalate now")
            .await
            .unwrap();
        assert_eq!(out, vec!["Sending sms to realtor: Escalate now".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_operator_number_skips_delivery() {
        let mut sender = MockSmsSender::new();
        sender.expect_send().times(0);

        let notifier = OperatorNotifier::new(Arc::new(sender), Some("  ".to_string()));
        let out = notifier
            .execute(&ActionContext::new("+15550001111"), "Escalate now")
            .await
            .unwrap();
        assert_eq!(out, vec!["Sending sms to realtor: Escalate now".to_string()]);
    }
}
