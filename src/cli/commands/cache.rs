//! Cache inspection commands. None of these consult the backing store.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{CacheEntry, Config, PutOutcome};
use crate::infrastructure::setup::build_cache;

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Look an id up in the cache only
    Get {
        /// Raw id
        id: String,
    },
    /// Write a value unless the id is already cached
    Put {
        /// Raw id
        id: String,
        /// Value to cache
        value: String,
    },
    /// List cached entries
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct CacheGetOutput {
    pub key: String,
    pub value: Option<String>,
}

impl CommandOutput for CacheGetOutput {
    fn to_human(&self) -> String {
        match &self.value {
            Some(value) => value.clone(),
            None => format!("{} is not cached.", self.key),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CachePutOutput {
    pub key: String,
    pub outcome: PutOutcome,
}

impl CommandOutput for CachePutOutput {
    fn to_human(&self) -> String {
        match self.outcome {
            PutOutcome::Stored => "stored".to_string(),
            PutOutcome::Rejected => "rejected (already cached)".to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CacheEntryOutput {
    pub key: String,
    pub value: String,
}

impl From<&CacheEntry> for CacheEntryOutput {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            key: entry.key.to_string(),
            value: entry.value.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CacheListOutput {
    pub entries: Vec<CacheEntryOutput>,
    pub total: usize,
}

impl CommandOutput for CacheListOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "Cache is empty.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KEY").add_attribute(Attribute::Bold),
                Cell::new("VALUE").add_attribute(Attribute::Bold),
            ]);
        for entry in &self.entries {
            table.add_row(vec![entry.key.clone(), truncate(&entry.value, 60)]);
        }

        format!("{table}\n\n{} cached entr{}", self.total, if self.total == 1 { "y" } else { "ies" })
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: CacheArgs, config: &Config, json_mode: bool) -> Result<()> {
    let cache = build_cache(&config.cache)?;

    match args.command {
        CacheCommands::Get { id } => {
            let key = cache.key(&id);
            let value = cache.get(&key).await;
            output(&CacheGetOutput { key: key.to_string(), value }, json_mode);
        }

        CacheCommands::Put { id, value } => {
            let key = cache.key(&id);
            let outcome = cache.put(&key, &value).await?;
            output(&CachePutOutput { key: key.to_string(), outcome }, json_mode);
        }

        CacheCommands::List => {
            let entries = cache.entries().await?;
            let out = CacheListOutput {
                total: entries.len(),
                entries: entries.iter().map(CacheEntryOutput::from).collect(),
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_output_miss() {
        let out = CacheGetOutput {
            key: "quote.9".to_string(),
            value: None,
        };
        assert_eq!(out.to_human(), "quote.9 is not cached.");
        assert_eq!(out.to_json(), serde_json::json!({"key": "quote.9", "value": null}));
    }

    #[test]
    fn test_put_output_rejected() {
        let out = CachePutOutput {
            key: "quote.1".to_string(),
            outcome: PutOutcome::Rejected,
        };
        assert_eq!(out.to_human(), "rejected (already cached)");
        assert_eq!(out.to_json()["outcome"], "rejected");
    }

    #[test]
    fn test_put_output_stored() {
        let out = CachePutOutput {
            key: "quote.7".to_string(),
            outcome: PutOutcome::Stored,
        };
        assert_eq!(out.to_human(), "stored");
        assert_eq!(out.to_json(), serde_json::json!({"key": "quote.7", "outcome": "stored"}));
    }

    #[test]
    fn test_list_output_counts() {
        let out = CacheListOutput {
            entries: vec![CacheEntryOutput {
                key: "quote.1".to_string(),
                value: "A quote.".to_string(),
            }],
            total: 1,
        };
        let human = out.to_human();
        assert!(human.contains("quote.1"));
        assert!(human.ends_with("1 cached entry"));
    }
}
