//! Port for the authoritative key-value store consulted on cache misses.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::errors::StoreResult;

/// Authoritative source of values, keyed by raw (un-namespaced) id.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Look up the value for `id`.
    ///
    /// Returns [`StoreError::NotFound`](crate::domain::errors::StoreError::NotFound)
    /// when no record matches.
    async fn lookup(&self, id: &str) -> StoreResult<String>;
}

#[async_trait]
impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        (**self).lookup(id).await
    }
}

#[async_trait]
impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        (**self).lookup(id).await
    }
}
