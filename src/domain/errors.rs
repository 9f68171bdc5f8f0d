//! Domain errors for the quote cache.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors surfaced by a [`BackingStore`](crate::domain::ports::BackingStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No record found for id {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Circuit open, store calls suspended until {retry_after}")]
    CircuitOpen { retry_after: DateTime<Utc> },

    #[error("Store request throttled")]
    Throttled,

    #[error("Record already exists for id {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Whether the failure may clear up if the same lookup is repeated.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the read-through cache and its media.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Store lookup failed for id {id}: {source}")]
    StoreLookupFailed {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("Cache medium error: {0}")]
    Medium(String),

    #[error("Corrupt cache record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Medium(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_transient() {
        assert!(StoreError::Unavailable("timeout".into()).is_transient());
        assert!(!StoreError::NotFound("1".into()).is_transient());
        assert!(!StoreError::Throttled.is_transient());
        assert!(!StoreError::CircuitOpen { retry_after: Utc::now() }.is_transient());
    }

    #[test]
    fn test_lookup_failure_message_names_id_and_cause() {
        let err = CacheError::StoreLookupFailed {
            id: "42".into(),
            source: StoreError::NotFound("42".into()),
        };
        assert_eq!(
            err.to_string(),
            "Store lookup failed for id 42: No record found for id 42"
        );
    }
}
