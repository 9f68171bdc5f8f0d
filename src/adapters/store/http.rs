//! HTTP quote service backing store.
//!
//! Looks quotes up with `GET {base_url}/quotes/{id}` and expects a JSON body
//! carrying at least a `text` field. A 404 is reported as
//! [`StoreError::NotFound`]; every other failure (non-success status,
//! network error, timeout, undecodable body) is reported as
//! [`StoreError::Unavailable`] so retry and circuit-breaker decorators can
//! treat it as transient.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::ports::BackingStore;

/// Configuration for [`HttpQuoteStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// Service root, e.g. `http://localhost:8080/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    text: String,
}

/// Backing store that queries a remote quote service.
#[derive(Debug, Clone)]
pub struct HttpQuoteStore {
    http: Client,
    base_url: Url,
}

impl HttpQuoteStore {
    pub fn new(config: HttpStoreConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            StoreError::Unavailable(format!("invalid base url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Unavailable(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build http client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// URL of the record for `id`, with `id` percent-encoded as one segment.
    fn quote_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("quotes").push(id);
        }
        url
    }
}

#[async_trait]
impl BackingStore for HttpQuoteStore {
    async fn lookup(&self, id: &str) -> StoreResult<String> {
        let url = self.quote_url(id);
        tracing::debug!(%url, "querying quote service");

        let resp = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("quote service request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "quote service returned {status}: {body}"
            )));
        }

        resp.json::<QuoteBody>()
            .await
            .map(|body| body.text)
            .map_err(|e| StoreError::Unavailable(format!("quote service response parse failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_url_encodes_id() {
        let store = HttpQuoteStore::new(HttpStoreConfig::new("http://localhost:9000/api/")).unwrap();
        assert_eq!(
            store.quote_url("42").as_str(),
            "http://localhost:9000/api/quotes/42"
        );
        assert_eq!(
            store.quote_url("a/b c").as_str(),
            "http://localhost:9000/api/quotes/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(HttpQuoteStore::new(HttpStoreConfig::new("not a url")).is_err());
        assert!(HttpQuoteStore::new(HttpStoreConfig::new("mailto:someone@example.com")).is_err());
    }
}
