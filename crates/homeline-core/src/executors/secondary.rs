//! delegate-to-secondary-agent executor

use super::{ActionContext, ActionExecutor};
use crate::actions::ActionKind;
use crate::error::Result;
use crate::utils::{mask_for_logging, mask_phone};
use async_trait::async_trait;
use homeline_llm::{CompletionRequest, LlmProvider, Message};
use std::sync::Arc;
use tracing::{info, warn};

const SECONDARY_SYSTEM_PROMPT: &str = "You are the back-office assistant of a real estate team. \
Answer the internal query concisely. Only use facts present in the query.";

/// Hands internal queries to a second model
///
/// The answer only reaches the logs; the confirmation returned to the
/// dispatcher is the same whether or not a model is attached.
pub struct SecondaryAgent {
    provider: Option<Arc<dyn LlmProvider>>,
    model: String,
}

impl SecondaryAgent {
    /// Agent that only confirms the delegation
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            provider: None,
            model: String::new(),
        }
    }

    /// Agent backed by `provider` using `model`
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
        }
    }

    /// Confirmation string for a delegated query
    #[must_use]
    pub fn confirmation(query: &str) -> String {
        format!("Calling second line agent with query: {query}")
    }
}

#[async_trait]
impl ActionExecutor for SecondaryAgent {
    fn kind(&self) -> ActionKind {
        ActionKind::SecondaryAgentQuery
    }

    async fn execute(&self, ctx: &ActionContext, payload: &str) -> Result<Vec<String>> {
        if let Some(provider) = &self.provider {
            let request = CompletionRequest::new(&self.model)
                .with_message(Message::system(SECONDARY_SYSTEM_PROMPT))
                .with_message(Message::user(payload));

            match provider.complete(request).await {
                Ok(answer) => info!(
                    session_key = %mask_phone(&ctx.session_key),
                    answer = %mask_for_logging(&answer.content),
                    "Secondary agent answered"
                ),
                Err(e) => warn!(session_key = %mask_phone(&ctx.session_key), error = %e, "Secondary agent failed"),
            }
        }
        Ok(vec![Self::confirmation(payload)])
    }
}
