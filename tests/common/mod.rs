//! Shared helpers for integration tests.

#![allow(dead_code)]

use quotecache::adapters::medium::FileMedium;
use quotecache::adapters::sqlite::{create_migrated_test_pool, SqliteQuoteStore};
use quotecache::{Namespace, ReadThroughCache};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Create a file-backed cache in a fresh temporary directory.
///
/// The directory is returned so it outlives the cache.
pub fn file_cache(namespace: &str) -> (TempDir, ReadThroughCache<FileMedium>) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let cache = reopen(&dir, namespace);
    (dir, cache)
}

/// Open another cache over the same file, as a restarted process would.
pub fn reopen(dir: &TempDir, namespace: &str) -> ReadThroughCache<FileMedium> {
    let medium = FileMedium::new(dir.path().join("cache.jsonl"));
    ReadThroughCache::new(Namespace::new(namespace).expect("valid namespace"), medium)
}

/// Create an in-memory quote database with migrations applied.
pub async fn setup_quote_store() -> (SqlitePool, SqliteQuoteStore) {
    let pool = create_migrated_test_pool()
        .await
        .expect("failed to create test database");
    let store = SqliteQuoteStore::new(pool.clone());
    (pool, store)
}
