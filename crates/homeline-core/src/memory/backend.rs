//! Backend selection from a connection string
//!
//! | Scheme                  | Backend       |
//! |-------------------------|---------------|
//! | `redis://`, `rediss://` | `RedisStore`  |
//! | `sqlite:`               | `SqliteStore` |
//! | `memory://`             | `MemoryStore` |

use super::redis_store::DEFAULT_PREFIX;
use super::{HistoryStore, MemoryStore, RedisStore, Role, SqliteStore, Turn};
use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::info;

/// History store chosen at startup
pub enum HistoryBackend {
    /// SQLite file or in-memory database
    Sqlite(SqliteStore),
    /// Redis lists
    Redis(RedisStore),
    /// Process memory
    Memory(MemoryStore),
}

impl HistoryBackend {
    /// Connect to the backend named by `url`
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` for an empty or unrecognised URL.
    pub async fn connect(url: &str, key_prefix: Option<&str>) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Configuration(
                "history store connection string is not set".to_string(),
            ));
        }

        if url.starts_with("redis://") || url.starts_with("rediss://") {
            let store = RedisStore::with_prefix(url, key_prefix.unwrap_or(DEFAULT_PREFIX))?;
            info!("Using Redis history store");
            Ok(Self::Redis(store))
        } else if url.starts_with("sqlite:") {
            let store = SqliteStore::connect(url).await?;
            info!("Using SQLite history store");
            Ok(Self::Sqlite(store))
        } else if url.starts_with("memory://") {
            let store = MemoryStore::try_new()?;
            info!("Using in-memory history store");
            Ok(Self::Memory(store))
        } else {
            Err(Error::Configuration(
                "unsupported history store scheme (use redis://, rediss://, sqlite: or memory://)"
                    .to_string(),
            ))
        }
    }

    /// Backend name for logs and health output
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Redis(_) => "redis",
            Self::Memory(_) => "memory",
        }
    }
}

#[async_trait]
impl HistoryStore for HistoryBackend {
    async fn append(&self, session_key: &str, role: Role, text: &str) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.append(session_key, role, text).await,
            Self::Redis(store) => store.append(session_key, role, text).await,
            Self::Memory(store) => store.append(session_key, role, text).await,
        }
    }

    async fn read_all(&self, session_key: &str) -> Result<Vec<Turn>> {
        match self {
            Self::Sqlite(store) => store.read_all(session_key).await,
            Self::Redis(store) => store.read_all(session_key).await,
            Self::Memory(store) => store.read_all(session_key).await,
        }
    }

    async fn clear(&self, session_key: &str) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.clear(session_key).await,
            Self::Redis(store) => store.clear(session_key).await,
            Self::Memory(store) => store.clear(session_key).await,
        }
    }

    async fn health_check(&self) -> Result<()> {
        match self {
            Self::Sqlite(store) => store.health_check().await,
            Self::Redis(store) => store.health_check().await,
            Self::Memory(store) => store.health_check().await,
        }
    }
}
