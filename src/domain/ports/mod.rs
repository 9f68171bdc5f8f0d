//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - BackingStore: authoritative lookups by raw id
//! - CacheMedium: append-only storage of cache entries
//!
//! The read-through cache depends only on these traits, never on a
//! concrete database, file format or HTTP client.

pub mod backing_store;
pub mod cache_medium;

pub use backing_store::BackingStore;
pub use cache_medium::CacheMedium;
