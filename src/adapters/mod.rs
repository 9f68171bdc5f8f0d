//! Infrastructure adapters for the cache media and backing stores.

pub mod medium;
pub mod sqlite;
pub mod store;
