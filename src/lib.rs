//! quotecache - a read-through cache in front of a quote store
//!
//! Values are looked up in a cache first; on a miss the authoritative
//! backing store is consulted and the answer is written back, so the next
//! lookup of the same id is served from the cache.
//!
//! # Architecture
//!
//! The crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): keys, entries, configuration, errors and ports
//! - **Service Layer** (`services`): the read-through cache and store decorators
//! - **Adapters** (`adapters`): cache media and backing stores
//! - **Infrastructure Layer** (`infrastructure`): config loading, logging, wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use quotecache::adapters::medium::MemoryMedium;
//! use quotecache::adapters::store::MemoryStore;
//! use quotecache::{Namespace, ReadThroughCache};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MemoryStore::with_records([("1", "Simplicity is prerequisite for reliability.")]);
//!     let cache = ReadThroughCache::new(Namespace::new("quote")?, MemoryMedium::new());
//!
//!     let first = cache.fetch("1", &store).await?;
//!     let second = cache.fetch("1", &store).await?;
//!     assert!(!first.is_cached() && second.is_cached());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{CacheError, CacheResult, StoreError, StoreResult};
pub use domain::models::{
    CacheEntry, CacheKey, Config, Fetched, Namespace, PutOutcome, Quote, Source,
};
pub use domain::ports::{BackingStore, CacheMedium};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CircuitBreakerStore, ReadThroughCache, RetryingStore, ThrottledStore};
