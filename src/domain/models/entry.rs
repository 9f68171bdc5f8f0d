//! Cache entries and read-through results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::CacheKey;

/// A single (key, value) record held by a cache medium.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub value: String,
}

impl CacheEntry {
    pub fn new(key: CacheKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Where a fetched value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Served from the cache medium without consulting the store.
    Cache,
    /// Looked up in the backing store (and written to the cache).
    Store,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value returned by a read-through fetch, annotated with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fetched {
    pub value: String,
    pub source: Source,
}

impl Fetched {
    pub fn from_cache(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: Source::Cache,
        }
    }

    pub fn from_store(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: Source::Store,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.source == Source::Cache
    }
}

/// Result of appending to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PutOutcome {
    /// The entry was appended.
    Stored,
    /// The key was already cached; the existing entry is untouched.
    Rejected,
}
