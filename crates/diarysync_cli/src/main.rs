//! diarysync CLI
//!
//! Command-line access to a diarysync record store.
//!
//! # Commands
//!
//! - `info` - Describe the service operations
//! - `list` - List the records of a partition
//! - `save` - Create or overwrite records from a JSON file
//! - `sync` - Reconcile a local record set with a partition
//! - `compact` - Rewrite the record log to reclaim space

mod commands;

use clap::{Parser, Subcommand};
use diarysync_server::DEFAULT_APP_ID;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// diarysync record store tools.
#[derive(Parser)]
#[command(name = "diarysync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Partition used when a record or listing names none
    #[arg(global = true, long, default_value = DEFAULT_APP_ID)]
    default_app_id: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the service operations
    Info,

    /// List the records of a partition, newest first
    List {
        /// Partition to list (defaults to --default-app-id)
        #[arg(short, long)]
        app_id: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Create or overwrite records
    Save {
        /// JSON file with one record or an array of records ("-" for stdin)
        input: PathBuf,
    },

    /// Reconcile a local record set with a partition
    Sync {
        /// Partition to synchronize
        #[arg(short, long)]
        app_id: String,

        /// JSON file with the local record array ("-" for stdin)
        input: PathBuf,
    },

    /// Rewrite the record log, keeping only the latest frame per record
    Compact,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = commands::server_config(&cli.default_app_id);

    match cli.command {
        Commands::Info => {
            commands::info::run(&config)?;
        }
        Commands::List { app_id, format } => {
            let path = cli.path.ok_or("Store path required for list")?;
            commands::list::run(&path, config, app_id, &format)?;
        }
        Commands::Save { input } => {
            let path = cli.path.ok_or("Store path required for save")?;
            commands::save::run(&path, config, &input)?;
        }
        Commands::Sync { app_id, input } => {
            let path = cli.path.ok_or("Store path required for sync")?;
            commands::sync::run(&path, config, &app_id, &input)?;
        }
        Commands::Compact => {
            let path = cli.path.ok_or("Store path required for compact")?;
            commands::compact::run(&path)?;
        }
        Commands::Version => {
            println!("diarysync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
