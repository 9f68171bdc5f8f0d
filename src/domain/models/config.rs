use serde::{Deserialize, Serialize};

/// Main configuration structure for quotecache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Cache namespace and medium
    #[serde(default)]
    pub cache: CacheConfig,

    /// Backing store selection
    #[serde(default)]
    pub store: StoreConfig,

    /// Retry policy for store lookups
    #[serde(default)]
    pub retry: RetryConfig,

    /// Circuit breaker around the store
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerSettings,

    /// Store request throttling
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Physical medium backing the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumKind {
    /// Process-local, lost on exit
    Memory,
    /// Append-only JSON-lines file
    File,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Key namespace prepended to every raw id
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Cache medium
    #[serde(default = "default_medium")]
    pub medium: MediumKind,

    /// Path of the cache file when `medium` is `file`
    #[serde(default = "default_cache_path")]
    pub path: String,
}

fn default_namespace() -> String {
    "quote".to_string()
}

const fn default_medium() -> MediumKind {
    MediumKind::File
}

fn default_cache_path() -> String {
    ".quotecache/cache.jsonl".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            medium: default_medium(),
            path: default_cache_path(),
        }
    }
}

/// Which authoritative store to consult on a cache miss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Http,
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    #[serde(default = "default_store_kind")]
    pub kind: StoreKind,

    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Base URL of the quote service when `kind` is `http`
    #[serde(default)]
    pub http_base_url: Option<String>,

    /// Per-request timeout for the quote service
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
}

const fn default_store_kind() -> StoreKind {
    StoreKind::Sqlite
}

fn default_database_path() -> String {
    ".quotecache/quotes.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_http_timeout_ms() -> u64 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: default_store_kind(),
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            http_base_url: None,
            http_timeout_ms: default_http_timeout_ms(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    100
}

const fn default_max_backoff_ms() -> u64 {
    2000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CircuitBreakerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Consecutive transient failures before the circuit opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Seconds to stay open before allowing a trial request
    #[serde(default = "default_open_timeout_secs")]
    pub open_timeout_secs: u64,

    /// Trial successes required to close the circuit again
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,
}

const fn default_true() -> bool {
    true
}

const fn default_failure_threshold() -> u32 {
    5
}

const fn default_open_timeout_secs() -> u64 {
    30
}

const fn default_success_threshold() -> u32 {
    1
}

impl Default for CircuitBreakerSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            failure_threshold: default_failure_threshold(),
            open_timeout_secs: default_open_timeout_secs(),
            success_threshold: default_success_threshold(),
        }
    }
}

/// Throttling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ThrottleConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Sustained store requests per second
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,

    /// Wait for a permit instead of failing with `Throttled`
    #[serde(default = "default_true")]
    pub wait: bool,
}

const fn default_requests_per_second() -> u32 {
    10
}

const fn default_burst_size() -> u32 {
    20
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
            wait: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
