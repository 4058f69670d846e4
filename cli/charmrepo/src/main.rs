//! charmrepo CLI — query the charm store from the command line.

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "charmrepo", version, about = "Query the charm store")]
struct Cli {
    /// Configuration file (default: nearest charmrepo.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Charm store URL, overriding the configuration
    #[arg(long, global = true)]
    url: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the latest revision of each charm
    Latest {
        /// Do not increase download statistics
        #[arg(long)]
        test_mode: bool,
        /// Metadata attribute sent to the store (repeatable)
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = commands::parse_attr)]
        attrs: Vec<(String, String)>,
        /// Charm URLs (e.g. cs:trusty/wordpress)
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the charm store URL
    Url,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.store.url = Some(url);
    }

    match cli.command {
        Commands::Latest {
            test_mode,
            attrs,
            ids,
        } => {
            let store = commands::open_store(&config, test_mode, &attrs)?;
            commands::latest::run(&store, &ids)
        }
        Commands::Url => {
            let store = commands::open_store(&config, false, &[])?;
            commands::url::run(&store);
            Ok(())
        }
    }
}

/// Load an explicit config file, or the nearest `charmrepo.toml`, or defaults.
fn load_config(path: Option<&std::path::Path>) -> Result<CliConfig> {
    if let Some(path) = path {
        return CliConfig::load(path);
    }
    let cwd = std::env::current_dir()?;
    match CliConfig::find_and_load(&cwd)? {
        Some((config, found)) => {
            tracing::debug!(path = %found.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(CliConfig::default()),
    }
}
