//! MemoryStorage - In-Process Backend
//!
//! TigerStyle: Bounded key/value store shared by every request.
//!
//! Writers are serialized by the store's lock: at most one writer per key at
//! a time, and the value observed afterwards is one of the attempted writes.
//! Nothing orders two requests racing on the same key.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PersistenceError, StorageStrategy};
use crate::constants::{MEMORY_ENTRIES_COUNT_MAX, MEMORY_KEY_DEFAULT, MEMORY_VALUE_BYTES_MAX};

// =============================================================================
// Memory Store
// =============================================================================

/// Shared in-process store. Cloning shares the underlying map.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    entries_count_max: usize,
    value_bytes_max: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store with the default bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(MEMORY_ENTRIES_COUNT_MAX, MEMORY_VALUE_BYTES_MAX)
    }

    /// Create a store with custom bounds.
    #[must_use]
    pub fn with_limits(entries_count_max: usize, value_bytes_max: usize) -> Self {
        assert!(entries_count_max > 0, "entry limit must be positive");
        assert!(value_bytes_max > 0, "value limit must be positive");
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            entries_count_max,
            value_bytes_max,
        }
    }

    /// Insert or replace a value.
    ///
    /// # Errors
    /// Returns `Exhausted` if the value is too large or a new key would
    /// exceed the entry limit.
    pub async fn put(&self, key: &str, value: &[u8]) -> Result<(), PersistenceError> {
        if value.len() > self.value_bytes_max {
            return Err(PersistenceError::exhausted(format!(
                "value too large: {} > {}",
                value.len(),
                self.value_bytes_max
            )));
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) && entries.len() >= self.entries_count_max {
            return Err(PersistenceError::exhausted(format!(
                "too many entries: {} >= {}",
                entries.len(),
                self.entries_count_max
            )));
        }
        entries.insert(key.to_string(), value.to_vec());

        // Postcondition
        assert!(entries.len() <= self.entries_count_max);
        Ok(())
    }

    /// Read a value.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Number of keys held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// Stores the payload under one key of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    store: MemoryStore,
    key: String,
}

impl MemoryStorage {
    /// Create a memory storage writing to the default key.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self::with_key(store, MEMORY_KEY_DEFAULT)
    }

    /// Create a memory storage writing to `key`.
    pub fn with_key(store: MemoryStore, key: impl Into<String>) -> Self {
        let key = key.into();
        assert!(!key.is_empty(), "memory key cannot be empty");
        Self { store, key }
    }
}

#[async_trait]
impl StorageStrategy for MemoryStorage {
    async fn persist(&self, payload: &[u8]) -> Result<(), PersistenceError> {
        self.store.put(&self.key, payload).await?;
        tracing::info!(key = %self.key, bytes = payload.len(), "Data saved to memory");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_and_read_back() {
        let store = MemoryStore::new();
        let storage = MemoryStorage::new(store.clone());

        storage.persist(b"Hello").await.unwrap();

        assert_eq!(store.get(MEMORY_KEY_DEFAULT).await, Some(b"Hello".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_value_limit() {
        let store = MemoryStore::with_limits(4, 3);
        let storage = MemoryStorage::new(store.clone());

        let result = storage.persist(b"four").await;
        assert!(matches!(result, Err(PersistenceError::Exhausted(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_entry_limit_allows_overwrite() {
        let store = MemoryStore::with_limits(1, 16);
        MemoryStorage::with_key(store.clone(), "a").persist(b"1").await.unwrap();

        // Replacing an existing key is fine at the limit
        MemoryStorage::with_key(store.clone(), "a").persist(b"2").await.unwrap();
        assert_eq!(store.get("a").await, Some(b"2".to_vec()));

        let result = MemoryStorage::with_key(store.clone(), "b").persist(b"3").await;
        assert!(matches!(result, Err(PersistenceError::Exhausted(_))));
    }

    #[tokio::test]
    async fn test_concurrent_writers_same_key() {
        let store = MemoryStore::new();
        let payloads: Vec<Vec<u8>> = (0..32).map(|i| format!("payload-{i}").into_bytes()).collect();

        let mut handles = Vec::new();
        for payload in payloads.clone() {
            let storage = MemoryStorage::new(store.clone());
            handles.push(tokio::spawn(async move { storage.persist(&payload).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Last write observed is one of the attempted writes
        let value = store.get(MEMORY_KEY_DEFAULT).await.unwrap();
        assert!(payloads.contains(&value));
    }
}
