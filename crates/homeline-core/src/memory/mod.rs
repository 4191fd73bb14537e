//! Memory - Per-session conversation history
//!
//! A session is the append-only log of turns exchanged with one phone
//! number. This module provides:
//! - `Turn`/`Role`: the log entries
//! - `ConversationWindow`: the paired view handed to the planner
//! - `HistoryStore`: the storage trait, with in-memory, Redis and SQLite
//!   backends selected from a connection string by `HistoryBackend`

mod backend;
mod redis_store;
mod sqlite_store;
mod store;
mod turn;
mod window;

pub use backend::HistoryBackend;
pub use redis_store::RedisStore;
pub use sqlite_store::SqliteStore;
pub use store::{HistoryStore, MemoryStore};
pub use turn::{Role, Turn};
pub use window::{reconstruct_window, ConversationWindow, Exchange};
