//! SQLite history store
//!
//! Turns live in a single `turns` table; insertion order (the rowid) is the
//! session order.
//!
//! # Usage
//!
//! ```no_run
//! use homeline_core::memory::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::connect("sqlite://data/history.db").await?;
//! # Ok(())
//! # }
//! ```

use super::{HistoryStore, Role, Turn};
use crate::error::{Error, Result};
use crate::utils::mask_phone;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// SQLite history store
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a store from a `sqlite:` connection string
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid or the schema cannot be created.
    pub async fn connect(url: &str) -> Result<Self> {
        if let Some(parent) = database_dir(url) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Store(format!("Failed to create database directory: {e}"))
            })?;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Configuration(format!("invalid SQLite URL: {e}")))?
            .create_if_missing(true);

        // Every pooled connection to an in-memory database is a separate database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        Self::open(options, max_connections).await
    }

    /// Open (or create) a store at a file path
    ///
    /// # Errors
    ///
    /// Returns error if the directory or database cannot be created.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Store(format!("Failed to create database directory: {e}"))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        Self::open(options, 5).await
    }

    async fn open(options: SqliteConnectOptions, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| Error::Store(format!("Failed to connect to SQLite: {e}")))?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("SQLite history store initialized");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_key TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Store(format!("Failed to create turns table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_turns_session ON turns(session_key, id)")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Failed to create index: {e}")))?;

        debug!("SQLite history schema initialized");
        Ok(())
    }
}

/// Directory of the database file named by a `sqlite:` URL, if any
fn database_dir(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or(rest);
    if file.is_empty() || file == ":memory:" {
        return None;
    }
    Path::new(file).parent().filter(|p| !p.as_os_str().is_empty())
}

#[async_trait]
impl HistoryStore for SqliteStore {
    async fn append(&self, session_key: &str, role: Role, text: &str) -> Result<()> {
        sqlx::query("INSERT INTO turns (session_key, role, content) VALUES (?, ?, ?)")
            .bind(session_key)
            .bind(role.as_str())
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Failed to append turn: {e}")))?;

        debug!(session_key = %mask_phone(session_key), role = %role, "Turn appended to SQLite");
        Ok(())
    }

    async fn read_all(&self, session_key: &str) -> Result<Vec<Turn>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT role, content FROM turns WHERE session_key = ? ORDER BY id")
                .bind(session_key)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| Error::Store(format!("Failed to read turns: {e}")))?;

        rows.into_iter()
            .map(|(role, text)| -> Result<Turn> {
                Ok(Turn {
                    role: role.parse()?,
                    text,
                })
            })
            .collect()
    }

    async fn clear(&self, session_key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM turns WHERE session_key = ?")
            .bind(session_key)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Failed to clear session: {e}")))?;

        debug!(session_key = %mask_phone(session_key), removed = result.rows_affected(), "Session cleared in SQLite");
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Error::Store(format!("Health check failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("history.db");
        let store = SqliteStore::new(&db_path).await.unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_database_dir() {
        assert_eq!(database_dir("sqlite:data/history.db"), Some(Path::new("data")));
        assert_eq!(
            database_dir("sqlite:///var/lib/homeline/h.db?mode=rwc"),
            Some(Path::new("/var/lib/homeline"))
        );
        assert_eq!(database_dir("sqlite::memory:"), None);
        assert_eq!(database_dir("sqlite:history.db"), None);
        assert_eq!(database_dir("redis://localhost"), None);
    }

    #[tokio::test]
    async fn test_connect_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("history.db");
        let url = format!("sqlite://{}", db_path.display());

        let store = SqliteStore::connect(&url).await.unwrap();
        store.append("+15550001", Role::User, "Hi").await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_sqlite_store_basic_operations() {
        let (store, _temp) = create_test_store().await;

        store.append("+15550001", Role::User, "Hello").await.unwrap();
        store
            .append("+15550001", Role::Assistant, "Hi, how can I help?")
            .await
            .unwrap();
        store.append("+15550002", Role::User, "Other").await.unwrap();

        let turns = store.read_all("+15550001").await.unwrap();
        assert_eq!(
            turns,
            vec![Turn::user("Hello"), Turn::assistant("Hi, how can I help?")]
        );

        store.clear("+15550001").await.unwrap();
        assert!(store.read_all("+15550001").await.unwrap().is_empty());
        assert_eq!(store.read_all("+15550002").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sqlite_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("history.db");

        {
            let store = SqliteStore::new(&db_path).await.unwrap();
            store.append("key", Role::User, "persisted").await.unwrap();
        }

        let reopened = SqliteStore::new(&db_path).await.unwrap();
        assert_eq!(
            reopened.read_all("key").await.unwrap(),
            vec![Turn::user("persisted")]
        );
    }

    #[tokio::test]
    async fn test_in_memory_url() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.append("k", Role::User, "x").await.unwrap();
        assert_eq!(store.read_all("k").await.unwrap().len(), 1);
        store.health_check().await.unwrap();
    }
}
