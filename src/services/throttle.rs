//! Token bucket throttling for store lookups.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::models::ThrottleConfig;
use crate::domain::ports::BackingStore;

/// Backing store decorator that limits the lookup rate.
///
/// With `wait` set, a lookup beyond the budget waits for a permit;
/// otherwise it fails with [`StoreError::Throttled`].
pub struct ThrottledStore<S> {
    inner: S,
    limiter: DefaultDirectRateLimiter,
    wait: bool,
}

impl<S: BackingStore> ThrottledStore<S> {
    /// Zero rates are treated as one.
    pub fn new(inner: S, requests_per_second: u32, burst_size: u32, wait: bool) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(rate).allow_burst(burst);

        Self {
            inner,
            limiter: RateLimiter::direct(quota),
            wait,
        }
    }

    pub fn from_config(inner: S, config: &ThrottleConfig) -> Self {
        Self::new(inner, config.requests_per_second, config.burst_size, config.wait)
    }
}

#[async_trait]
impl<S: BackingStore> BackingStore for ThrottledStore<S> {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        if self.wait {
            self.limiter.until_ready().await;
        } else if self.limiter.check().is_err() {
            tracing::warn!(id, "store lookup throttled");
            return Err(StoreError::Throttled);
        }
        self.inner.lookup(id).await
    }
}
