//! Executors - Side effects for each action kind
//!
//! Every `ActionKind` has exactly one executor in an `ExecutorSet`. An
//! executor returns the confirmation strings that end up in the dispatch
//! result, or an error the dispatcher turns into a degraded entry.

mod appointment;
mod client;
mod operator;
mod secondary;
mod sms;

pub use appointment::{AppointmentExecutor, APPOINTMENT_NOT_CONFIGURED, APPOINTMENT_PROMPT};
pub use client::ClientNotifier;
pub use operator::OperatorNotifier;
pub use secondary::SecondaryAgent;
pub use sms::{LogSmsSender, SmsSender};

#[cfg(test)]
pub use sms::MockSmsSender;

use crate::actions::ActionKind;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Per-dispatch context handed to executors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    /// Session key (the client's phone number)
    pub session_key: String,
}

impl ActionContext {
    /// Context for `session_key`
    #[must_use]
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
        }
    }
}

/// Handler for one action kind
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Kind this executor handles
    fn kind(&self) -> ActionKind;

    /// Perform the action for `payload`
    async fn execute(&self, ctx: &ActionContext, payload: &str) -> Result<Vec<String>>;
}

/// One executor per action kind
#[derive(Clone)]
pub struct ExecutorSet {
    client: Arc<dyn ActionExecutor>,
    operator: Arc<dyn ActionExecutor>,
    secondary: Arc<dyn ActionExecutor>,
    appointment: Arc<dyn ActionExecutor>,
}

impl ExecutorSet {
    /// Default executors over `sender`; secondary agent and calendar disabled
    #[must_use]
    pub fn new(sender: Arc<dyn SmsSender>, operator_number: Option<String>) -> Self {
        Self {
            client: Arc::new(ClientNotifier::new(Arc::clone(&sender))),
            operator: Arc::new(OperatorNotifier::new(sender, operator_number)),
            secondary: Arc::new(SecondaryAgent::disabled()),
            appointment: Arc::new(AppointmentExecutor::disabled()),
        }
    }

    /// Replace the client reply executor
    #[must_use]
    pub fn with_client(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.client = executor;
        self
    }

    /// Replace the operator alert executor
    #[must_use]
    pub fn with_operator(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.operator = executor;
        self
    }

    /// Replace the secondary agent executor
    #[must_use]
    pub fn with_secondary(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.secondary = executor;
        self
    }

    /// Replace the appointment executor
    #[must_use]
    pub fn with_appointment(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.appointment = executor;
        self
    }

    /// Executor for `kind`
    #[must_use]
    pub fn for_kind(&self, kind: ActionKind) -> &dyn ActionExecutor {
        match kind {
            ActionKind::ClientReply => self.client.as_ref(),
            ActionKind::OperatorAlert => self.operator.as_ref(),
            ActionKind::SecondaryAgentQuery => self.secondary.as_ref(),
            ActionKind::ScheduleAppointment => self.appointment.as_ref(),
        }
    }
}

impl Default for ExecutorSet {
    fn default() -> Self {
        Self::new(Arc::new(LogSmsSender), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_kind_routes_every_kind() {
        let set = ExecutorSet::default();
        for kind in [
            ActionKind::ClientReply,
            ActionKind::OperatorAlert,
            ActionKind::SecondaryAgentQuery,
            ActionKind::ScheduleAppointment,
        ] {
            assert_eq!(set.for_kind(kind).kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_default_set_confirms_without_side_effects() {
        let set = ExecutorSet::default();
        let ctx = ActionContext::new("+15550001111");

        let out = set
            .for_kind(ActionKind::ClientReply)
            .execute(&ctx, "Hi")
            .await
            .unwrap();
        assert_eq!(out, vec!["Sending sms to client: Hi".to_string()]);

        let out = set
            .for_kind(ActionKind::ScheduleAppointment)
            .execute(&ctx, "Sat")
            .await
            .unwrap();
        assert_eq!(out, vec![APPOINTMENT_NOT_CONFIGURED.to_string()]);
    }
}
