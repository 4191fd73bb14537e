//! Server module for Homeline
//!
//! Contains the server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for all server components
//! - `loader`: Configuration loading from files and environment
//! - `logging`: Tracing subscriber installation
//! - `validation`: Startup and production configuration checks
//! - `init`: Dispatcher construction and the HTTP run loop

pub mod config;
mod init;
mod loader;
mod logging;
mod validation;

// Re-export public API
pub use init::{build_dispatcher, connect_store, run};
pub use loader::load_config;
pub use logging::init_logging;
