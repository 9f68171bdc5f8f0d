//! In-memory cache medium.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::CacheResult;
use crate::domain::models::CacheEntry;
use crate::domain::ports::CacheMedium;

/// Process-local medium backed by a vector of entries.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    entries: RwLock<Vec<CacheEntry>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheMedium for MemoryMedium {
    async fn scan(&self) -> CacheResult<Vec<CacheEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn append(&self, entry: &CacheEntry) -> CacheResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CacheKey;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let medium = MemoryMedium::new();
        assert!(medium.is_empty().await);

        for id in ["3", "1", "2"] {
            let key = CacheKey::new("quote", id).unwrap();
            medium.append(&CacheEntry::new(key, format!("v{id}"))).await.unwrap();
        }

        let ids: Vec<String> = medium
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key.id().to_string())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(medium.len().await, 3);
    }
}
