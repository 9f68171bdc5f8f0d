use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::{Config, MediumKind, StoreKind};
use crate::domain::models::Namespace;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid cache namespace: {0}")]
    InvalidNamespace(String),

    #[error("Cache file path cannot be empty when the medium is 'file'")]
    EmptyCachePath,

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("store.http_base_url is required when store.kind is 'http'")]
    MissingHttpBaseUrl,

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must not exceed max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid circuit breaker {0}: must be at least 1")]
    InvalidCircuitThreshold(&'static str),

    #[error("Invalid throttle {0}: must be at least 1")]
    InvalidThrottle(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Directory holding project-local configuration and data.
pub const CONFIG_DIR: &str = ".quotecache";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "QUOTECACHE_";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .quotecache/config.yaml (project config, created by init)
    /// 3. .quotecache/local.yaml (project local overrides, optional)
    /// 4. Environment variables (QUOTECACHE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(".")
    }

    /// Same as [`load`](Self::load), resolving the config directory under `root`.
    pub fn load_from_dir(root: impl AsRef<Path>) -> Result<Config> {
        let config_dir = root.as_ref().join(CONFIG_DIR);
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_dir.join("config.yaml")))
            .merge(Yaml::file(config_dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, with environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Namespace::new(config.cache.namespace.as_str())
            .map_err(|e| ConfigError::InvalidNamespace(e.to_string()))?;

        if config.cache.medium == MediumKind::File && config.cache.path.trim().is_empty() {
            return Err(ConfigError::EmptyCachePath);
        }

        match config.store.kind {
            StoreKind::Sqlite => {
                if config.store.database_path.trim().is_empty() {
                    return Err(ConfigError::EmptyDatabasePath);
                }
                if config.store.max_connections == 0 {
                    return Err(ConfigError::InvalidMaxConnections(config.store.max_connections));
                }
            }
            StoreKind::Http => {
                if config.store.http_base_url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                    return Err(ConfigError::MissingHttpBaseUrl);
                }
            }
        }

        if config.retry.initial_backoff_ms > config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.circuit_breaker.failure_threshold == 0 {
            return Err(ConfigError::InvalidCircuitThreshold("failure_threshold"));
        }
        if config.circuit_breaker.success_threshold == 0 {
            return Err(ConfigError::InvalidCircuitThreshold("success_threshold"));
        }

        if config.throttle.requests_per_second == 0 {
            return Err(ConfigError::InvalidThrottle("requests_per_second"));
        }
        if config.throttle.burst_size == 0 {
            return Err(ConfigError::InvalidThrottle("burst_size"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
