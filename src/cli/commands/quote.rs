//! Quote store management commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use crate::adapters::sqlite::SqliteQuoteStore;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, Quote, StoreKind};
use crate::infrastructure::setup::open_quote_pool;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    #[command(subcommand)]
    pub command: QuoteCommands,
}

#[derive(Subcommand, Debug)]
pub enum QuoteCommands {
    /// Add a quote to the database
    Add {
        /// Quote id
        id: String,
        /// Quote text
        text: String,
        /// Who said it
        #[arg(long, short)]
        author: Option<String>,
    },
    /// List quotes in the database
    List,
}

#[derive(Debug, serde::Serialize)]
pub struct QuoteListOutput {
    pub quotes: Vec<Quote>,
    pub total: usize,
}

impl CommandOutput for QuoteListOutput {
    fn to_human(&self) -> String {
        if self.quotes.is_empty() {
            return "No quotes found.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("TEXT").add_attribute(Attribute::Bold),
                Cell::new("AUTHOR").add_attribute(Attribute::Bold),
            ]);
        for quote in &self.quotes {
            table.add_row(vec![
                quote.id.clone(),
                truncate(&quote.text, 60),
                quote.author.clone().unwrap_or_else(|| "-".to_string()),
            ]);
        }

        format!("{table}\n\n{} quote(s)", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QuoteAddOutput {
    pub success: bool,
    pub message: String,
}

impl CommandOutput for QuoteAddOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: QuoteArgs, config: &Config, json_mode: bool) -> Result<()> {
    if config.store.kind != StoreKind::Sqlite {
        anyhow::bail!("Quote management requires the sqlite store (store.kind is http)");
    }

    let pool = open_quote_pool(&config.store)
        .await
        .context("Failed to open quote database. Run 'quotecache init' first.")?;
    let store = SqliteQuoteStore::new(pool);

    match args.command {
        QuoteCommands::Add { id, text, author } => {
            let mut quote = Quote::new(id.as_str(), text);
            if let Some(author) = author {
                quote = quote.with_author(author);
            }
            store.add(&quote).await?;
            let out = QuoteAddOutput {
                success: true,
                message: format!("Added quote {id}."),
            };
            output(&out, json_mode);
        }

        QuoteCommands::List => {
            let quotes = store.list().await?;
            let out = QuoteListOutput {
                total: quotes.len(),
                quotes,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
