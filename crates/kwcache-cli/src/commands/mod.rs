//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kwcache_sync::SyncConfig;

pub mod snapshot;
pub mod source;
pub mod status;
pub mod sync;

/// Keyword graph cache - mirror the relational keyword graph into Redis
#[derive(Parser)]
#[command(name = "kwcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (defaults to ./kwcache.toml when present)
    #[arg(short, long, global = true, env = "KWCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Relational keyword source commands
    #[command(subcommand)]
    Source(source::SourceCommands),

    /// Run the sync pipeline
    #[command(subcommand)]
    Sync(sync::SyncCommands),

    /// Inspect or clear the cached snapshot
    #[command(subcommand)]
    Snapshot(snapshot::SnapshotCommands),

    /// Check source and cache connectivity
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = SyncConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Source(cmd) => source::execute(cmd, &config).await,
            Commands::Sync(cmd) => sync::execute(cmd, &config).await,
            Commands::Snapshot(cmd) => snapshot::execute(cmd, &config).await,
            Commands::Status => status::execute(&config).await,
        }
    }
}
