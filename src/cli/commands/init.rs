//! Implementation of the `quotecache init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::setup::{create_config_dir, create_config_file, run_migrations, SetupPaths};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file with the defaults
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub initialized_path: PathBuf,
    pub config_written: bool,
    pub database_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push("\nWrote default configuration to .quotecache/config.yaml".to_string());
        }
        lines.push(format!("Quote database ready at {}", self.database_path.display()));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&args.path)
    };

    let paths = SetupPaths::in_dir(&target_path);
    let already_initialized = paths.is_initialized();

    create_config_dir(&paths)?;
    let config_written = create_config_file(&paths, args.force)?;
    run_migrations(&paths).await?;

    let message = match (already_initialized, config_written) {
        (true, false) => "Project already initialized. Use --force to rewrite the config file.",
        (true, true) => "Project reinitialized successfully.",
        (false, _) => "Project initialized successfully.",
    };

    let out = InitOutput {
        success: true,
        message: message.to_string(),
        initialized_path: target_path,
        config_written,
        database_path: paths.database_file,
    };
    output(&out, json_mode);
    Ok(())
}
