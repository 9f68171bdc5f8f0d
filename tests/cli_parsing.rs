use clap::Parser;
use quotecache::cli::commands::cache::CacheCommands;
use quotecache::cli::commands::quote::QuoteCommands;
use quotecache::cli::{Cli, Commands};

#[test]
fn test_parse_init_force() {
    let cli = Cli::try_parse_from(["quotecache", "init", "--force"]).unwrap();

    match cli.command {
        Commands::Init(args) => assert!(args.force),
        _ => panic!("Wrong top-level command"),
    }
    assert!(!cli.json);
    assert!(cli.config.is_none());
}

#[test]
fn test_parse_fetch() {
    let cli = Cli::try_parse_from(["quotecache", "--json", "fetch", "a.b"]).unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Fetch(args) => assert_eq!(args.id, "a.b"),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_cache_subcommands() {
    let cli = Cli::try_parse_from(["quotecache", "cache", "get", "1"]).unwrap();
    match cli.command {
        Commands::Cache(args) => match args.command {
            CacheCommands::Get { id } => assert_eq!(id, "1"),
            _ => panic!("Wrong cache command"),
        },
        _ => panic!("Wrong top-level command"),
    }

    let cli = Cli::try_parse_from(["quotecache", "cache", "list", "-j"]).unwrap();
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Commands::Cache(ref args) if matches!(args.command, CacheCommands::List)
    ));
}

#[test]
fn test_parse_quote_list() {
    let cli = Cli::try_parse_from(["quotecache", "quote", "list"]).unwrap();
    match cli.command {
        Commands::Quote(args) => assert!(matches!(args.command, QuoteCommands::List)),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_cache_put_requires_value() {
    assert!(Cli::try_parse_from(["quotecache", "cache", "put", "1"]).is_err());
}

#[test]
fn test_unknown_command_rejected() {
    assert!(Cli::try_parse_from(["quotecache", "serve"]).is_err());
}
