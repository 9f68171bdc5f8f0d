//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use commands::{cache::CacheArgs, fetch::FetchArgs, init::InitArgs, quote::QuoteArgs};

#[derive(Parser, Debug)]
#[command(name = "quotecache")]
#[command(about = "Read-through cache in front of a quote store", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .quotecache/
    #[arg(short, long, global = true, env = "QUOTECACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the configuration directory, config file and quote database
    Init(InitArgs),

    /// Fetch an id through the cache, falling back to the store
    Fetch(FetchArgs),

    /// Inspect or write the cache directly
    Cache(CacheArgs),

    /// Manage quotes in the sqlite store
    Quote(QuoteArgs),
}

/// Load configuration, preferring an explicit file over the project directory.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Print an error in the requested format and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
