//! In-memory backing store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ports::BackingStore;

/// A `HashMap`-backed store that counts how often it is consulted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
    lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `(id, value)` pairs.
    pub fn with_records<I, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let records = records
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            records: RwLock::new(records),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, id: impl Into<String>, value: impl Into<String>) {
        self.records
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id.into(), value.into());
    }

    /// Number of `lookup` calls served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_counts_hits_and_misses() {
        let store = MemoryStore::with_records([("1", "A quote.")]);

        assert_eq!(store.lookup("1").await.unwrap(), "A quote.");
        assert!(matches!(store.lookup("2").await, Err(StoreError::NotFound(id)) if id == "2"));
        assert_eq!(store.lookup_count(), 2);

        store.insert("2", "Another.");
        assert_eq!(store.lookup("2").await.unwrap(), "Another.");
    }
}
