//! Service layer: the read-through cache and the store decorators
//! that add retry, circuit breaking and throttling.

pub mod circuit_breaker;
pub mod read_through_cache;
pub mod retry;
pub mod throttle;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerStore, CircuitState};
pub use read_through_cache::ReadThroughCache;
pub use retry::{RetryPolicy, RetryingStore};
pub use throttle::ThrottledStore;
