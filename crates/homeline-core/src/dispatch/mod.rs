//! Dispatch - Inbound message to executed actions
//!
//! `Dispatcher::execute` is the whole conversation step for one SMS:
//!
//! 1. The reset sentinel clears the session and short-circuits.
//! 2. History is read and paired into a window, the inbound text is
//!    appended as a user turn, and the planner is called.
//! 3. Planner output is fence-stripped and validated as a whole.
//! 4. Actions run in order, each behind its own error boundary. Only a
//!    successful client reply appends an assistant turn.
//!
//! Planner and parse failures become single-element sentinel results.
//! Store failures are returned as `Err`.
//!
//! Two messages from one number arriving together are not serialized:
//! their history reads and appends may interleave.


use crate::actions::{parse_plan, ActionKind, PlannerAction};
use crate::error::Result;
use crate::executors::{ActionContext, ExecutorSet};
use crate::memory::{reconstruct_window, HistoryStore, Role, Turn};
use crate::planner::{Planner, DEFAULT_MAX_ACTIONS};
use crate::utils::{mask_for_logging, mask_phone};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Inbound text that clears a session
pub const RESET_SENTINEL: &str = "Restart";
/// Result returned after a reset
pub const MEMORY_CLEARED: &str = "Memory cleared";
/// Result returned when planner output is not a JSON array of objects
pub const INVALID_JSON: &str = "error  invalid json";
/// Result returned when the planner call fails or times out
pub const PLANNER_UNAVAILABLE: &str = "error  planner unavailable";

/// Ordered confirmation strings for one dispatch
pub type DispatchResult = Vec<String>;

/// Runs the conversation step for inbound messages
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn HistoryStore>,
    planner: Arc<dyn Planner>,
    executors: ExecutorSet,
    max_actions: usize,
}

impl Dispatcher {
    /// Create a dispatcher with the default action cap
    #[must_use]
    pub fn new(
        store: Arc<dyn HistoryStore>,
        planner: Arc<dyn Planner>,
        executors: ExecutorSet,
    ) -> Self {
        Self {
            store,
            planner,
            executors,
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }

    /// Cap the number of array entries acted on per message (at least 1)
    #[must_use]
    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions.max(1);
        self
    }

    /// The history store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn HistoryStore> {
        &self.store
    }

    /// Handle one inbound message for `session_key`
    ///
    /// # Errors
    ///
    /// Returns an error only when the history store fails.
    #[instrument(
        skip(self, session_key, text),
        fields(session_key = %mask_phone(session_key), chars = text.chars().count())
    )]
    pub async fn execute(&self, session_key: &str, text: &str) -> Result<DispatchResult> {
        if text == RESET_SENTINEL {
            self.reset(session_key).await?;
            return Ok(vec![MEMORY_CLEARED.to_string()]);
        }

        let turns = self.store.read_all(session_key).await?;
        let window = reconstruct_window(&turns);
        debug!(turns = turns.len(), exchanges = window.len(), "History loaded");

        self.store.append(session_key, Role::User, text).await?;

        let raw = match self.planner.plan(&window, text).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Planner failed");
                return Ok(vec![PLANNER_UNAVAILABLE.to_string()]);
            }
        };

        let plan = match parse_plan(&raw, self.max_actions) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, raw = %mask_for_logging(&raw), "Planner output rejected");
                return Ok(vec![INVALID_JSON.to_string()]);
            }
        };

        if plan.dropped_entries > 0 {
            warn!(
                dropped = plan.dropped_entries,
                max_actions = self.max_actions,
                "Planner returned too many actions"
            );
        }
        for key in &plan.ignored_keys {
            debug!(key = %key, "Ignoring unknown action key");
        }

        let ctx = ActionContext::new(session_key);
        let mut results = Vec::with_capacity(plan.actions.len());
        for action in &plan.actions {
            results.extend(self.run_action(&ctx, action).await);
        }

        info!(actions = plan.actions.len(), results = results.len(), "Dispatch complete");
        Ok(results)
    }

    async fn run_action(&self, ctx: &ActionContext, action: &PlannerAction) -> Vec<String> {
        let kind = action.kind();
        let payload = action.payload();

        match self.executors.for_kind(kind).execute(ctx, payload).await {
            Ok(confirmations) => {
                if kind == ActionKind::ClientReply {
                    if let Err(e) = self
                        .store
                        .append(&ctx.session_key, Role::Assistant, payload)
                        .await
                    {
                        error!(error = %e, "Failed to record client reply");
                    }
                }
                confirmations
            }
            Err(e) => {
                warn!(action = %kind, error = %e, "Action failed");
                vec![format!("error  {} failed: {e}", kind.label())]
            }
        }
    }

    /// Every turn of a session, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the history store fails.
    pub async fn history(&self, session_key: &str) -> Result<Vec<Turn>> {
        self.store.read_all(session_key).await
    }

    /// Delete every turn of a session
    ///
    /// # Errors
    ///
    /// Returns an error if the history store fails.
    #[instrument(skip(self, session_key), fields(session_key = %mask_phone(session_key)))]
    pub async fn reset(&self, session_key: &str) -> Result<()> {
        self.store.clear(session_key).await?;
        info!("Session cleared");
        Ok(())
    }
}
