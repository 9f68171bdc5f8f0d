//! Project setup and component wiring
//!
//! Handles:
//! - Configuration directory and default config file creation
//! - Quote database creation and migrations
//! - Building the cache and the decorated backing store from configuration

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::adapters::medium::{FileMedium, MemoryMedium};
use crate::adapters::sqlite::{database_url, initialize_database, PoolConfig, SqliteQuoteStore};
use crate::adapters::store::{HttpQuoteStore, HttpStoreConfig};
use crate::domain::models::{CacheConfig, Config, MediumKind, Namespace, StoreConfig, StoreKind};
use crate::domain::ports::{BackingStore, CacheMedium};
use crate::infrastructure::config::CONFIG_DIR;
use crate::services::{
    CircuitBreakerConfig, CircuitBreakerStore, ReadThroughCache, RetryPolicy, RetryingStore,
    ThrottledStore,
};

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# quotecache configuration
# Override settings by editing this file, adding .quotecache/local.yaml,
# or setting environment variables with the QUOTECACHE_ prefix.
#
# Example environment variables:
#   export QUOTECACHE_CACHE__MEDIUM=memory
#   export QUOTECACHE_STORE__KIND=http
#   export QUOTECACHE_STORE__HTTP_BASE_URL=http://localhost:8080
#   export QUOTECACHE_LOGGING__LEVEL=debug

cache:
  # Namespace prepended to every id ("quote" gives keys like quote.42)
  namespace: "quote"
  # memory or file
  medium: "file"
  # Append-only JSON-lines cache file
  path: ".quotecache/cache.jsonl"

store:
  # sqlite or http
  kind: "sqlite"
  database_path: ".quotecache/quotes.db"
  max_connections: 5
  # Required when kind is http
  # http_base_url: "http://localhost:8080"
  http_timeout_ms: 5000

# Retry policy for transient store failures
retry:
  max_retries: 3
  initial_backoff_ms: 100
  max_backoff_ms: 2000

# Stop calling a failing store for a while
circuit_breaker:
  enabled: true
  failure_threshold: 5
  open_timeout_secs: 30
  success_threshold: 1

# Token bucket limit on store requests
throttle:
  enabled: false
  requests_per_second: 10
  burst_size: 20
  wait: true

logging:
  # trace, debug, info, warn, error
  level: "info"
  # json or pretty
  format: "pretty"
"#;

/// Paths used by project initialization
#[derive(Debug, Clone)]
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub database_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::in_dir(current_dir))
    }

    /// Get setup paths rooted at `root`
    pub fn in_dir(root: impl AsRef<Path>) -> Self {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        Self {
            config_file: config_dir.join("config.yaml"),
            database_file: config_dir.join("quotes.db"),
            config_dir,
        }
    }

    /// Check if the project is already initialized
    pub fn is_initialized(&self) -> bool {
        self.config_file.exists() && self.database_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")
}

/// Create the default configuration file
///
/// Returns `false` when a config file already exists and `force` is unset.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

/// Create the quote database and apply migrations
pub async fn run_migrations(paths: &SetupPaths) -> Result<()> {
    let url = database_url(&paths.database_file.to_string_lossy());
    let pool = initialize_database(&url, None)
        .await
        .context("Failed to initialize quote database")?;
    pool.close().await;
    Ok(())
}

/// Open the quote database named in the store configuration
pub async fn open_quote_pool(config: &StoreConfig) -> Result<SqlitePool> {
    let pool_config = PoolConfig {
        max_connections: config.max_connections,
        ..PoolConfig::default()
    };
    initialize_database(&database_url(&config.database_path), Some(pool_config))
        .await
        .with_context(|| format!("Failed to open quote database at {}", config.database_path))
}

/// Build the read-through cache over the configured medium
pub fn build_cache(config: &CacheConfig) -> Result<ReadThroughCache<Box<dyn CacheMedium>>> {
    let namespace = Namespace::new(config.namespace.as_str()).context("Invalid cache namespace")?;
    let medium: Box<dyn CacheMedium> = match config.medium {
        MediumKind::Memory => Box::new(MemoryMedium::new()),
        MediumKind::File => Box::new(FileMedium::new(&config.path)),
    };
    Ok(ReadThroughCache::new(namespace, medium))
}

/// Build the configured backing store wrapped in its decorators
///
/// Layering, outermost first: retry, circuit breaker, throttle, store.
/// An open circuit is not transient, so retries stop as soon as it trips.
pub async fn build_store(config: &Config) -> Result<Box<dyn BackingStore>> {
    let mut store: Box<dyn BackingStore> = match config.store.kind {
        StoreKind::Sqlite => Box::new(SqliteQuoteStore::new(open_quote_pool(&config.store).await?)),
        StoreKind::Http => {
            let base_url = config
                .store
                .http_base_url
                .clone()
                .context("store.http_base_url is required for the http store")?;
            let http_config = HttpStoreConfig::new(base_url)
                .with_timeout(Duration::from_millis(config.store.http_timeout_ms));
            Box::new(HttpQuoteStore::new(http_config)?)
        }
    };

    if config.throttle.enabled {
        store = Box::new(ThrottledStore::from_config(store, &config.throttle));
    }
    if config.circuit_breaker.enabled {
        store = Box::new(CircuitBreakerStore::new(
            store,
            CircuitBreakerConfig::from(&config.circuit_breaker),
        ));
    }
    if config.retry.max_retries > 0 {
        store = Box::new(RetryingStore::new(store, RetryPolicy::from(&config.retry)));
    }

    Ok(store)
}
