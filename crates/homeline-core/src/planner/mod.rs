//! Planner - Conversation window and new SMS to raw action text
//!
//! The planner fills the instruction template with the rendered window and
//! the new message, sends it to the model in one completion, and returns the
//! completion text untouched. Fence stripping and parsing belong to the
//! dispatcher.

mod config;
mod prompt;


pub use config::{PlannerConfig, DEFAULT_MAX_ACTIONS, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use prompt::{render_template, validate_template, DEFAULT_TEMPLATE};

use crate::error::Result;
use crate::memory::ConversationWindow;
use async_trait::async_trait;
use homeline_llm::{CompletionRequest, LlmProvider, Message};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Produces raw planner output for a new message
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plan the response to `message` given the prior `window`
    async fn plan(&self, window: &ConversationWindow, message: &str) -> Result<String>;
}

/// Planner backed by an LLM provider
pub struct LlmPlanner {
    provider: Arc<dyn LlmProvider>,
    config: PlannerConfig,
}

impl LlmPlanner {
    /// Create a planner
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: PlannerConfig) -> Self {
        Self { provider, config }
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Build the completion request for one planning call
    #[must_use]
    pub fn build_request(&self, window: &ConversationWindow, message: &str) -> CompletionRequest {
        let prompt = render_template(&self.config.template, &window.render(), message);

        let mut request = CompletionRequest::new(&self.config.model)
            .with_message(Message::user(prompt))
            .with_temperature(self.config.temperature);
        if let Some(max_tokens) = self.config.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    #[instrument(skip(self, window, message), fields(provider = %self.provider.name(), exchanges = window.len()))]
    async fn plan(&self, window: &ConversationWindow, message: &str) -> Result<String> {
        let request = self.build_request(window, message);
        let timeout = self.config.timeout;

        let response = match tokio::time::timeout(timeout, self.provider.complete(request)).await
        {
            Ok(response) => response?,
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Planner call timed out");
                return Err(homeline_llm::Error::Timeout(timeout.as_millis() as u64).into());
            }
        };

        debug!(model = %response.model, chars = response.content.len(), "Planner responded");
        Ok(response.content)
    }
}
