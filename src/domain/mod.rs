//! Domain layer for the quote cache
//!
//! This module contains core models, error types and port traits.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CacheError, CacheResult, StoreError, StoreResult};
