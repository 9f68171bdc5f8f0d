//! Namespaced cache keys.
//!
//! A key is a structured (namespace, id) pair. Two keys are equal only when
//! both parts are equal, so `quote.4` never matches `quote.42` and
//! (`a`, `b.c`) never matches (`a.b`, `c`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{CacheError, CacheResult};

/// Separator used when rendering a key as a single string.
pub const KEY_SEPARATOR: char = '.';

/// A validated key namespace such as `quote`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Validate and wrap a namespace name.
    ///
    /// Namespaces must be non-empty and may not contain the key separator
    /// or whitespace.
    pub fn new(name: impl Into<String>) -> CacheResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CacheError::InvalidKey("namespace cannot be empty".to_string()));
        }
        if name.contains(KEY_SEPARATOR) || name.chars().any(char::is_whitespace) {
            return Err(CacheError::InvalidKey(format!(
                "namespace '{name}' may not contain '{KEY_SEPARATOR}' or whitespace"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the full key for a raw identifier in this namespace.
    pub fn key(&self, id: impl Into<String>) -> CacheKey {
        CacheKey {
            namespace: self.clone(),
            id: id.into(),
        }
    }
}

impl TryFrom<String> for Namespace {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full cache key: a namespace plus the caller's raw identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    namespace: Namespace,
    id: String,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> CacheResult<Self> {
        Ok(Namespace::new(namespace)?.key(id))
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The raw identifier, as the backing store knows it.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, KEY_SEPARATOR, self.id)
    }
}
