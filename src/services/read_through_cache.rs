//! Read-through cache over an authoritative backing store.
//!
//! On a hit the cached value is returned and the store is never consulted.
//! On a miss the value is looked up in the store, appended to the cache
//! medium, and returned annotated as store-sourced. Entries are written at
//! most once per key and never updated or expired, so a value fetched once
//! stays cached for the life of the medium.

use tokio::sync::Mutex;

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::models::{CacheEntry, CacheKey, Fetched, Namespace, PutOutcome};
use crate::domain::ports::{BackingStore, CacheMedium};

/// Cache that fills itself from a [`BackingStore`] on miss.
///
/// Constructed once and passed to callers explicitly; there is no global
/// instance.
pub struct ReadThroughCache<M> {
    namespace: Namespace,
    medium: M,
    /// Serializes duplicate-check plus append, and the miss path of fetch.
    write_lock: Mutex<()>,
}

impl<M: CacheMedium> ReadThroughCache<M> {
    pub fn new(namespace: Namespace, medium: M) -> Self {
        Self {
            namespace,
            medium,
            write_lock: Mutex::new(()),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Namespace a raw store id into a full cache key.
    pub fn key(&self, raw_id: &str) -> CacheKey {
        self.namespace.key(raw_id)
    }

    /// Look `key` up in the cache only.
    ///
    /// Absence is `None`. A medium that cannot be read is logged and treated
    /// as a miss, so this never fails.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        match self.find(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache medium unreadable, treating as miss");
                None
            }
        }
    }

    async fn find(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        Ok(self
            .medium
            .scan()
            .await?
            .into_iter()
            .find(|entry| &entry.key == key)
            .map(|entry| entry.value))
    }

    /// Append `(key, value)` unless `key` is already cached.
    ///
    /// A duplicate key is reported as [`PutOutcome::Rejected`] and the
    /// existing entry is left as it was. `Err` means the medium itself failed.
    pub async fn put(&self, key: &CacheKey, value: &str) -> CacheResult<PutOutcome> {
        let _guard = self.write_lock.lock().await;
        self.put_locked(key, value).await
    }

    /// Duplicate check plus append. Callers must hold `write_lock`.
    async fn put_locked(&self, key: &CacheKey, value: &str) -> CacheResult<PutOutcome> {
        if self.find(key).await?.is_some() {
            tracing::warn!(key = %key, "key already cached, write skipped");
            return Ok(PutOutcome::Rejected);
        }

        self.medium
            .append(&CacheEntry::new(key.clone(), value))
            .await?;
        tracing::debug!(key = %key, "cache entry written");
        Ok(PutOutcome::Stored)
    }

    /// Read-through lookup of `raw_id`.
    ///
    /// Hits are served without locking. A miss takes the write lock and
    /// checks the cache again before consulting the store, so concurrent
    /// fetches of one fresh key call the store once and append once.
    ///
    /// Store failures are returned as [`CacheError::StoreLookupFailed`] and
    /// leave the cache untouched; they are never retried here. Failing to
    /// write the fetched value back is logged and does not fail the fetch.
    pub async fn fetch<S>(&self, raw_id: &str, store: &S) -> CacheResult<Fetched>
    where
        S: BackingStore + ?Sized,
    {
        let key = self.key(raw_id);

        if let Some(value) = self.get(&key).await {
            tracing::debug!(key = %key, "cache hit");
            return Ok(Fetched::from_cache(value));
        }

        let _guard = self.write_lock.lock().await;
        if let Some(value) = self.get(&key).await {
            tracing::debug!(key = %key, "cache filled while waiting, hit");
            return Ok(Fetched::from_cache(value));
        }

        tracing::debug!(key = %key, "cache miss, consulting store");
        let value = store
            .lookup(raw_id)
            .await
            .map_err(|source| CacheError::StoreLookupFailed {
                id: raw_id.to_string(),
                source,
            })?;

        match self.put_locked(&key, &value).await {
            Ok(PutOutcome::Stored) => tracing::info!(key = %key, "filled cache from store"),
            Ok(PutOutcome::Rejected) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "failed to cache fetched value"),
        }

        Ok(Fetched::from_store(value))
    }

    /// Every cached entry, in insertion order.
    pub async fn entries(&self) -> CacheResult<Vec<CacheEntry>> {
        self.medium.scan().await
    }
}
