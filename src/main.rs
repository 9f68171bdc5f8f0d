//! quotecache CLI entry point.

use clap::Parser;

use quotecache::cli::commands::{cache, fetch, init, quote};
use quotecache::cli::{handle_error, load_config, Cli, Commands};
use quotecache::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    // init writes the config, so it runs before any config is loaded.
    let command = match cli.command {
        Commands::Init(args) => {
            if let Err(err) = init::execute(args, json).await {
                handle_error(err, json);
            }
            return;
        }
        command => command,
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, json),
    };

    let result = match command {
        Commands::Init(_) => Ok(()),
        Commands::Fetch(args) => fetch::execute(args, &config, json).await,
        Commands::Cache(args) => cache::execute(args, &config, json).await,
        Commands::Quote(args) => quote::execute(args, &config, json).await,
    };

    if let Err(err) = result {
        handle_error(err, json);
    }
}
