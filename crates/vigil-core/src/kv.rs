//! Key-value store client abstraction
//!
//! The storage layer sits on a distributed, consistent key-value store. This
//! trait captures the small set of operations it needs; every call is atomic
//! per key and implementations are shared across in-flight requests as
//! `Arc<dyn KvStore>`.

use async_trait::async_trait;

use crate::Result;

/// A key and its stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Key-value store client
///
/// Implementations:
/// - `MemoryKvStore`: in-process map (tests, embedded use)
/// - `SqliteKvStore`: durable single-node store backed by SQLite
///
/// # Errors
/// All methods return `Error::Upstream` when the backend fails. Retry and
/// backoff are the responsibility of the implementation.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the value stored at `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Create or overwrite `key`.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Create or overwrite `key` only if `guard_key` exists.
    ///
    /// The existence check and the write form one atomic transaction.
    /// Returns `false`, without writing, when the guard key is absent.
    async fn put_if_exists(&self, guard_key: &str, key: &str, value: Vec<u8>) -> Result<bool>;

    /// Remove `key`. Returns whether a value was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All pairs whose key starts with `prefix`, sorted by key.
    async fn list_prefix(&self, prefix: &str) -> Result<Vec<KvPair>>;

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
