//! Read-through fetch command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, Fetched, Source};
use crate::infrastructure::setup::{build_cache, build_store};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Raw id to fetch (namespaced by the configured cache namespace)
    pub id: String,
}

#[derive(Debug, serde::Serialize)]
pub struct FetchOutput {
    pub key: String,
    pub value: String,
    pub source: Source,
}

impl FetchOutput {
    pub fn new(key: String, fetched: Fetched) -> Self {
        Self {
            key,
            value: fetched.value,
            source: fetched.source,
        }
    }
}

impl CommandOutput for FetchOutput {
    fn to_human(&self) -> String {
        let provenance = match self.source {
            Source::Cache => "FROM CACHE",
            Source::Store => "FROM STORE",
        };
        format!("{}\n[{}: {}]", self.value, provenance, self.key)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "value": self.value, "source": self.source })
    }
}

pub async fn execute(args: FetchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let cache = build_cache(&config.cache)?;
    let store = build_store(config).await?;

    let fetched = cache.fetch(&args.id, store.as_ref()).await?;
    let out = FetchOutput::new(cache.key(&args.id).to_string(), fetched);
    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_output_marks_provenance() {
        let out = FetchOutput::new("quote.1".to_string(), Fetched::from_cache("A quote."));
        assert_eq!(out.to_human(), "A quote.\n[FROM CACHE: quote.1]");

        let out = FetchOutput::new("quote.1".to_string(), Fetched::from_store("A quote."));
        assert!(out.to_human().contains("FROM STORE"));
    }

    #[test]
    fn test_json_output_shape() {
        let out = FetchOutput::new("quote.42".to_string(), Fetched::from_store("hello"));
        assert_eq!(
            out.to_json(),
            serde_json::json!({ "value": "hello", "source": "store" })
        );
    }
}
