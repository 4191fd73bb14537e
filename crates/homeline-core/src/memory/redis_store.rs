//! Redis history store
//!
//! Each session is a Redis list of JSON-encoded turns under
//! `<prefix><session_key>`. Appends are `RPUSH`, reads are `LRANGE 0 -1`,
//! and a reset is a single `DEL`.

use super::{HistoryStore, Role, Turn};
use crate::error::{Error, Result};
use crate::utils::mask_phone;
use async_trait::async_trait;
use tracing::debug;

/// Default key prefix for session lists
pub const DEFAULT_PREFIX: &str = "homeline:history:";

/// Redis-backed history store
///
/// Consider enabling Redis AUTH and TLS (`rediss://`) in production.
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    /// Create a new Redis store
    ///
    /// # Errors
    ///
    /// Returns error if the Redis URL is invalid
    pub fn new(redis_url: &str) -> Result<Self> {
        Self::with_prefix(redis_url, DEFAULT_PREFIX)
    }

    /// Create with a custom key prefix
    ///
    /// # Errors
    ///
    /// Returns error if the Redis URL is invalid
    pub fn with_prefix(redis_url: &str, prefix: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| Error::Configuration(format!("invalid Redis URL: {e}")))?;

        Ok(Self {
            client,
            prefix: prefix.to_string(),
        })
    }

    fn build_key(&self, session_key: &str) -> String {
        format!("{}{}", self.prefix, session_key)
    }

    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Store(format!("Redis connection failed: {e}")))
    }
}

#[async_trait]
impl HistoryStore for RedisStore {
    async fn append(&self, session_key: &str, role: Role, text: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(session_key);

        let json = serde_json::to_string(&Turn {
            role,
            text: text.to_string(),
        })
        .map_err(|e| Error::Internal(format!("Failed to serialize turn: {e}")))?;

        let len: i64 = redis::cmd("RPUSH")
            .arg(&key)
            .arg(&json)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Store(format!("Redis RPUSH failed: {e}")))?;

        debug!(session_key = %mask_phone(session_key), role = %role, turns = len, "Turn appended to Redis");
        Ok(())
    }

    async fn read_all(&self, session_key: &str) -> Result<Vec<Turn>> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(session_key);

        let items: Vec<String> = redis::cmd("LRANGE")
            .arg(&key)
            .arg(0)
            .arg(-1)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Store(format!("Redis LRANGE failed: {e}")))?;

        items
            .iter()
            .map(|item| {
                serde_json::from_str(item)
                    .map_err(|e| Error::Store(format!("Failed to deserialize turn: {e}")))
            })
            .collect()
    }

    async fn clear(&self, session_key: &str) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let key = self.build_key(session_key);

        let deleted: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Store(format!("Redis DEL failed: {e}")))?;

        debug!(session_key = %mask_phone(session_key), deleted = deleted > 0, "Session cleared in Redis");
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Store(format!("Redis PING failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefixing() {
        let store = RedisStore::with_prefix("redis://127.0.0.1:6379", "test:").unwrap();
        assert_eq!(store.build_key("+15550001"), "test:+15550001");
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let err = RedisStore::new("not a url").err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }

    // Run with: cargo test --features redis-tests
    #[cfg(feature = "redis-tests")]
    #[tokio::test]
    async fn test_redis_round_trip() {
        let store = RedisStore::with_prefix("redis://127.0.0.1:6379", "homeline:test:").unwrap();
        store.clear("redis-key").await.unwrap();

        store.append("redis-key", Role::User, "Hello").await.unwrap();
        store
            .append("redis-key", Role::Assistant, "Hi!")
            .await
            .unwrap();

        let turns = store.read_all("redis-key").await.unwrap();
        assert_eq!(turns, vec![Turn::user("Hello"), Turn::assistant("Hi!")]);

        store.clear("redis-key").await.unwrap();
        assert!(store.read_all("redis-key").await.unwrap().is_empty());
    }
}
