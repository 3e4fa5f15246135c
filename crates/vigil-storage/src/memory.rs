//! In-memory key-value store

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use vigil_core::{KvPair, KvStore, Result};

/// In-process key-value store
///
/// Every mutation happens inside a single write-lock critical section, so a
/// reader never observes a partially applied write. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    state: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let state = self.state.read().await;
        Ok(state.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut state = self.state.write().await;
        state.insert(key.to_string(), value);
        Ok(())
    }

    async fn put_if_exists(&self, guard_key: &str, key: &str, value: Vec<u8>) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.contains_key(guard_key) {
            return Ok(false);
        }
        state.insert(key.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.remove(key).is_some())
    }

    async fn list_prefix(&self, prefix: &str) -> Result<Vec<KvPair>> {
        let state = self.state.read().await;
        let pairs = state
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvPair::new(key.clone(), value.clone()))
            .collect();
        Ok(pairs)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state.contains_key(key))
    }
}
