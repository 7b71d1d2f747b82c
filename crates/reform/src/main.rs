//! reform CLI - bulk reform generation and cleanup.
//!
//! Works over an existing media tree: walks the originals directory,
//! generates any missing reforms, and can list or delete the reform files
//! a namespace has produced.
//!
//! # Usage
//!
//! ```bash
//! # Generate missing reforms for every original
//! reform create
//!
//! # List reform files
//! reform list --contains sunset
//!
//! # Delete reform files
//! reform delete --contains sunset
//!
//! # View configuration
//! reform config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// reform - bulk generation and cleanup of derived image variants.
#[derive(Parser, Debug)]
#[command(name = "reform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate missing reforms for every original image
    Create(cli::create::CreateArgs),

    /// Delete reform files
    Delete(cli::delete::DeleteArgs),

    /// List reform files
    List(cli::list::ListArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // An explicitly named config file must load; the default location may
    // be absent, in which case defaults apply.
    // Note: logging isn't initialized yet, so use eprintln for warnings.
    let config = match &cli.config {
        Some(path) => reform_core::Config::load_from(path)?,
        None => match reform_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `reform config path`."
                );
                reform_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("reform v{}", reform_core::VERSION);

    match cli.command {
        Commands::Create(args) => cli::create::execute(args, &config),
        Commands::Delete(args) => cli::delete::execute(args, &config),
        Commands::List(args) => cli::list::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, &config),
    }
}
