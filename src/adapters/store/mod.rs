//! Backing store adapters other than the database.

pub mod http;
pub mod memory;

pub use http::{HttpQuoteStore, HttpStoreConfig};
pub use memory::MemoryStore;
