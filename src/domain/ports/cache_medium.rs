//! Port for the physical storage of cache entries.

use async_trait::async_trait;

use crate::domain::errors::CacheResult;
use crate::domain::models::CacheEntry;

/// Append-only storage with full-scan reads.
///
/// Media do not index, update or deduplicate; uniqueness of keys is
/// maintained by the cache that owns the medium.
#[async_trait]
pub trait CacheMedium: Send + Sync {
    /// Read every entry, in insertion order.
    async fn scan(&self) -> CacheResult<Vec<CacheEntry>>;

    /// Append one entry.
    async fn append(&self, entry: &CacheEntry) -> CacheResult<()>;
}

#[async_trait]
impl<M: CacheMedium + ?Sized> CacheMedium for Box<M> {
    async fn scan(&self) -> CacheResult<Vec<CacheEntry>> {
        (**self).scan().await
    }

    async fn append(&self, entry: &CacheEntry) -> CacheResult<()> {
        (**self).append(entry).await
    }
}
