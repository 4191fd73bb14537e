//! Homeline Core - Conversation Dispatch Engine
//!
//! This crate provides the core logic of the Homeline SMS assistant:
//! - Memory: per-phone-number turn logs (in-memory, Redis, SQLite)
//! - Planner: LLM-backed action planning from a fixed prompt template
//! - Actions: classification and parsing of the planner's JSON output
//! - Executors: client/operator SMS, secondary agent, appointment booking
//! - Calendar: Google Calendar event creation
//! - Dispatch: the loop tying all of the above together

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod actions;
pub mod calendar;
pub mod dispatch;
pub mod error;
pub mod executors;
pub mod memory;
pub mod planner;
pub mod utils;

pub use actions::{classify_key, parse_plan, strip_code_fences, ActionKind, ParsedPlan, PlanError, PlannerAction};
pub use calendar::{CalendarClient, CalendarEvent, GoogleCalendarClient, GoogleCalendarConfig};
pub use dispatch::{
    DispatchResult, Dispatcher, INVALID_JSON, MEMORY_CLEARED, PLANNER_UNAVAILABLE, RESET_SENTINEL,
};
pub use error::{Error, Result};
pub use executors::{
    ActionContext, ActionExecutor, AppointmentExecutor, ClientNotifier, ExecutorSet,
    LogSmsSender, OperatorNotifier, SecondaryAgent, SmsSender,
};
pub use memory::{
    reconstruct_window, ConversationWindow, Exchange, HistoryBackend, HistoryStore, MemoryStore,
    RedisStore, Role, SqliteStore, Turn,
};
pub use planner::{LlmPlanner, Planner, PlannerConfig, DEFAULT_TEMPLATE};
