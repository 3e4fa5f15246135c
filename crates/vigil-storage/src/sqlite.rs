//! SqliteKvStore - KvStore implementation backed by SQLite
//!
//! Durable single-node backend. Every operation is one SQL statement, so
//! SQLite's statement atomicity gives the per-key atomicity the storage
//! layer relies on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use vigil_core::{Error, KvPair, KvStore, Result};

/// Connection settings for the SQLite backend
///
/// # Example
/// ```
/// use vigil_storage::SqliteKvConfig;
///
/// let config = SqliteKvConfig::new("/var/lib/vigil/store.db")
///     .with_max_connections(10)
///     .with_acquire_timeout_secs(2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteKvConfig {
    /// Path to the database file (created if missing)
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout for acquiring a pooled connection
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_path() -> String {
    "vigil.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for SqliteKvConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl SqliteKvConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout_secs(mut self, secs: u64) -> Self {
        self.acquire_timeout_secs = secs;
        self
    }
}

/// SQLite-backed key-value store
#[derive(Clone)]
pub struct SqliteKvStore {
    pool: Arc<SqlitePool>,
}

impl SqliteKvStore {
    /// Open (or create) the database described by `config` and run migrations.
    ///
    /// # Errors
    /// - `Error::Upstream` if the database cannot be opened or migrated
    pub async fn new(config: &SqliteKvConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| Error::Upstream(format!("Failed to open SQLite database: {}", e)))?;

        info!("Opened SQLite key-value store at {}", config.path);

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Private in-memory database. A single long-lived connection keeps the
    /// database alive for the lifetime of the store.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| Error::Config(format!("Invalid SQLite options: {}", e)))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| Error::Upstream(format!("Failed to open SQLite database: {}", e)))?;

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create from an existing pool (useful for testing)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value BLOB NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Upstream(format!("Failed to create kv table: {}", e)))?;

        debug!("SQLite key-value schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read {}: {}", key, e)))?;

        match row {
            Some(row) => {
                let value: Vec<u8> = row
                    .try_get("value")
                    .map_err(|e| Error::Upstream(format!("Failed to extract value: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Upstream(format!("Failed to write {}: {}", key, e)))?;

        Ok(())
    }

    async fn put_if_exists(&self, guard_key: &str, key: &str, value: Vec<u8>) -> Result<bool> {
        // The WHERE clause keeps the upsert unambiguous and makes the
        // existence check part of the same statement.
        let result = sqlx::query(
            r#"
            INSERT INTO kv (key, value)
            SELECT ?1, ?2 WHERE EXISTS (SELECT 1 FROM kv WHERE key = ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(guard_key)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Upstream(format!("Failed to write {}: {}", key, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Upstream(format!("Failed to delete {}: {}", key, e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_prefix(&self, prefix: &str) -> Result<Vec<KvPair>> {
        let rows = sqlx::query(
            "SELECT key, value FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Upstream(format!("Failed to list {}: {}", prefix, e)))?;

        rows.into_iter()
            .map(|row| {
                let key: String = row
                    .try_get("key")
                    .map_err(|e| Error::Upstream(format!("Failed to extract key: {}", e)))?;
                let value: Vec<u8> = row
                    .try_get("value")
                    .map_err(|e| Error::Upstream(format!("Failed to extract value: {}", e)))?;
                Ok(KvPair { key, value })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SqliteKvConfig::default();
        assert_eq!(config.path, "vigil.db");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 5);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SqliteKvConfig::new("/tmp/x.db")
            .with_max_connections(10)
            .with_acquire_timeout_secs(2);

        assert_eq!(config.path, "/tmp/x.db");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout_secs, 2);
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = SqliteKvStore::in_memory().await.unwrap();

        store.put("key1", b"value".to_vec()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"value".to_vec()));

        store.put("key1", b"other".to_vec()).await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some(b"other".to_vec()));

        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_if_exists() {
        let store = SqliteKvStore::in_memory().await.unwrap();

        assert!(!store.put_if_exists("guard", "key1", b"v".to_vec()).await.unwrap());
        assert!(!store.exists("key1").await.unwrap());

        store.put("guard", Vec::new()).await.unwrap();
        assert!(store.put_if_exists("guard", "key1", b"v1".to_vec()).await.unwrap());
        assert!(store.put_if_exists("guard", "key1", b"v2".to_vec()).await.unwrap());
        assert_eq!(store.get("key1").await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn test_list_prefix() {
        let store = SqliteKvStore::in_memory().await.unwrap();

        store.put("/a/2", b"2".to_vec()).await.unwrap();
        store.put("/a/1", b"1".to_vec()).await.unwrap();
        store.put("/ab/1", b"x".to_vec()).await.unwrap();

        let pairs = store.list_prefix("/a/").await.unwrap();
        let keys: Vec<&str> = pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["/a/1", "/a/2"]);
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.db");
        let config = SqliteKvConfig::new(path.to_string_lossy().to_string());

        {
            let store = SqliteKvStore::new(&config).await.unwrap();
            store.put("key1", b"value1".to_vec()).await.unwrap();
            store.pool().close().await;
        }

        let reopened = SqliteKvStore::new(&config).await.unwrap();
        assert_eq!(reopened.get("key1").await.unwrap(), Some(b"value1".to_vec()));
    }
}
