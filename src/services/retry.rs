//! Retry policy with exponential backoff for store lookups.
//!
//! Backoff doubles with each retry, starting at `initial_backoff` and capped
//! at `max_backoff`. Only transient errors are retried; a store that
//! answers "not found" is believed immediately.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::RetryConfig;
use crate::domain::ports::BackingStore;

/// Retry policy configuration for handling transient errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.initial_backoff_ms),
            Duration::from_millis(config.max_backoff_ms),
        )
    }
}

impl RetryPolicy {
    /// Create a new retry policy.
    ///
    /// `max_backoff` is raised to `initial_backoff` if it is smaller.
    pub fn new(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff before retry number `attempt + 1` (zero-based).
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }

    fn should_retry(&self, err: &StoreError, attempt: u32) -> bool {
        err.is_transient() && attempt < self.max_retries
    }

    /// Run `operation` until it succeeds, fails permanently, or retries are
    /// exhausted.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "store lookup succeeded after retrying");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if !self.should_retry(&err, attempt) {
                        if err.is_transient() {
                            warn!(attempts = attempt + 1, error = %err, "store lookup failed, giving up");
                        }
                        return Err(err);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "transient store failure, retrying"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Backing store decorator that retries transient lookup failures.
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: BackingStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: BackingStore> BackingStore for RetryingStore<S> {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        self.policy.execute(|| self.inner.lookup(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with `Unavailable` a fixed number of times, then answers.
    struct FlakyStore {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BackingStore for FlakyStore {
        async fn lookup(&self, id: &str) -> StoreResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures_left.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_left.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            if id == "missing" {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(format!("value-{id}"))
        }
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1), Duration::from_millis(4))
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(5, Duration::from_millis(100), Duration::from_millis(500));
        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_backoff(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_backoff(2), Duration::from_millis(400));
        assert_eq!(policy.calculate_backoff(3), Duration::from_millis(500));
        assert_eq!(policy.calculate_backoff(40), Duration::from_millis(500));
    }

    #[test]
    fn test_max_backoff_never_below_initial() {
        let policy = RetryPolicy::new(1, Duration::from_millis(50), Duration::from_millis(10));
        assert_eq!(policy.calculate_backoff(0), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_recovers_from_transient_failures() {
        let store = RetryingStore::new(FlakyStore::new(2), fast_policy(3));
        assert_eq!(store.lookup("1").await.unwrap(), "value-1");
        assert_eq!(store.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let store = RetryingStore::new(FlakyStore::new(10), fast_policy(2));
        let err = store.lookup("1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let store = RetryingStore::new(FlakyStore::new(0), fast_policy(5));
        let err = store.lookup("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy_makes_one_attempt() {
        let store = RetryingStore::new(FlakyStore::new(1), RetryPolicy::none());
        assert!(store.lookup("1").await.is_err());
        assert_eq!(store.inner().calls(), 1);
    }
}
