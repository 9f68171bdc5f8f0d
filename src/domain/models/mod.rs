pub mod config;
pub mod entry;
pub mod key;
pub mod quote;

pub use config::{
    CacheConfig, CircuitBreakerSettings, Config, LoggingConfig, MediumKind, RetryConfig,
    StoreConfig, StoreKind, ThrottleConfig,
};
pub use entry::{CacheEntry, Fetched, PutOutcome, Source};
pub use key::{CacheKey, Namespace, KEY_SEPARATOR};
pub use quote::Quote;
