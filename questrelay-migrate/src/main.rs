//! Quest Relay Migration Tool
//!
//! Provisions the file cache store ahead of deployment and reports what
//! a data directory currently holds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

mod provision;
mod status;

#[derive(Parser)]
#[command(name = "questrelay-migrate")]
#[command(about = "Provisioning tool for the Quest Relay cache store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and schema marker
    Provision {
        /// Path to the cache data directory
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Show schema version and cache entry freshness
    Status {
        /// Path to the cache data directory
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Cache key to inspect
        #[arg(short, long, default_value = "discord_quests")]
        key: String,

        /// Freshness window used for the fresh/stale label
        #[arg(short, long, env = "CACHE_DURATION_MINUTES", default_value_t = 30)]
        window_minutes: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Provision { data_dir } => {
            info!("Provisioning cache store");
            provision::provision_store(&data_dir)
                .await
                .context("Failed to provision cache store")?;
            info!("Cache store ready at {:?}", data_dir);
        }

        Commands::Status {
            data_dir,
            key,
            window_minutes,
        } => {
            let window = chrono::Duration::minutes(i64::from(window_minutes));
            let report = status::check_status(&data_dir, &key, window)
                .await
                .context("Failed to read cache store status")?;
            println!("{}", report);
        }
    }

    Ok(())
}
