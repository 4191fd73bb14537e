//! History storage trait and in-memory backend
//!
//! # Production Safety
//!
//! When `HOMELINE_ENV=production`, `MemoryStore::try_new()` returns an
//! error. Set `HOMELINE_ALLOW_MEMORY_STORE_IN_PRODUCTION=1` to bypass.

use super::{Role, Turn};
use crate::error::{Error, Result};
use crate::utils::mask_phone;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

/// Check if running in production environment
pub(crate) fn is_production() -> bool {
    std::env::var("HOMELINE_ENV")
        .map(|v| v.to_lowercase() == "production")
        .unwrap_or(false)
}

fn is_production_bypass_enabled() -> bool {
    std::env::var("HOMELINE_ALLOW_MEMORY_STORE_IN_PRODUCTION")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Append-only per-session turn log
///
/// A read after an append on the same session observes that append. No
/// ordering is promised between concurrent writers on one session.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a turn to the end of a session
    async fn append(&self, session_key: &str, role: Role, text: &str) -> Result<()>;

    /// Read every turn of a session, oldest first (empty if unknown)
    async fn read_all(&self, session_key: &str) -> Result<Vec<Turn>>;

    /// Delete every turn of a session
    async fn clear(&self, session_key: &str) -> Result<()>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

/// In-memory history store (for development/testing)
///
/// Data is lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<RwLock<HashMap<String, Vec<Turn>>>>,
}

impl MemoryStore {
    /// Create a new memory store without the production check
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory store
    ///
    /// # Errors
    ///
    /// Returns error if `HOMELINE_ENV=production` unless bypass is enabled.
    pub fn try_new() -> Result<Self> {
        if is_production() {
            if !is_production_bypass_enabled() {
                error!("MemoryStore is not allowed in production");
                return Err(Error::Configuration(
                    "memory:// history store is not allowed in production".to_string(),
                ));
            }
            warn!("MemoryStore in production: history will not survive a restart");
        }
        Ok(Self::new())
    }

    /// Number of sessions currently held
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append(&self, session_key: &str, role: Role, text: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_key.to_string())
            .or_default()
            .push(Turn {
                role,
                text: text.to_string(),
            });
        debug!(session_key = %mask_phone(session_key), role = %role, "Turn appended");
        Ok(())
    }

    async fn read_all(&self, session_key: &str) -> Result<Vec<Turn>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_key).cloned().unwrap_or_default())
    }

    async fn clear(&self, session_key: &str) -> Result<()> {
        let removed = self.sessions.write().await.remove(session_key);
        debug!(session_key = %mask_phone(session_key), existed = removed.is_some(), "Session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_then_read_preserves_order() {
        let store = MemoryStore::new();
        store.append("+15550001", Role::User, "Hi").await.unwrap();
        store
            .append("+15550001", Role::Assistant, "Hello!")
            .await
            .unwrap();
        store.append("+15550001", Role::User, "Bye").await.unwrap();

        let turns = store.read_all("+15550001").await.unwrap();
        assert_eq!(
            turns,
            vec![Turn::user("Hi"), Turn::assistant("Hello!"), Turn::user("Bye")]
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = MemoryStore::new();
        store.append("a", Role::User, "one").await.unwrap();
        store.append("b", Role::User, "two").await.unwrap();

        assert_eq!(store.read_all("a").await.unwrap(), vec![Turn::user("one")]);
        assert_eq!(store.session_count().await, 2);

        store.clear("a").await.unwrap();
        assert!(store.read_all("a").await.unwrap().is_empty());
        assert_eq!(store.read_all("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_reads_empty_and_clears_cleanly() {
        let store = MemoryStore::new();
        assert!(store.read_all("nobody").await.unwrap().is_empty());
        store.clear("nobody").await.unwrap();
        store.health_check().await.unwrap();
    }
}
