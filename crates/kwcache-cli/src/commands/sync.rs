//! Sync pipeline CLI commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use kwcache_core::{MemoryStore, SnapshotStore};
use kwcache_sync::{run_scheduled, SyncConfig};

use crate::context;
use crate::output;

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Run one sync now
    Run {
        /// Publish into an in-memory store instead of Redis
        #[arg(long)]
        dry_run: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run sync on a schedule until Ctrl+C
    Watch {
        /// Seconds between runs (overrides sync.interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
}

pub async fn execute(cmd: SyncCommands, config: &SyncConfig) -> Result<()> {
    match cmd {
        SyncCommands::Run { dry_run, json } => cmd_run(config, dry_run, json).await,
        SyncCommands::Watch { interval } => cmd_watch(config, interval).await,
    }
}

/// Run a single sync and report the outcome.
async fn cmd_run(config: &SyncConfig, dry_run: bool, json: bool) -> Result<()> {
    let store: Arc<dyn SnapshotStore> = if dry_run {
        Arc::new(MemoryStore::new())
    } else {
        context::connect_store(config).await?
    };
    let orchestrator = context::orchestrator(config, store)?;

    if !json {
        let target = if dry_run { "memory (dry run)".to_string() } else { config.cache.redis_url.clone() };
        println!("{} {}", "Syncing keywords to".bold(), target.cyan());
    }

    match orchestrator.run_once().await {
        Ok(summary) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_summary(&summary);
            }
            Ok(())
        }
        Err(e) if e.is_noop() => {
            println!("{}", "A sync run is already in progress; nothing to do.".yellow());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "Sync failed:".red().bold(), e);
            println!("{}", "The previously published snapshot is unchanged.".dimmed());
            Err(e.into())
        }
    }
}

/// Run the scheduler until interrupted.
async fn cmd_watch(config: &SyncConfig, interval: Option<u64>) -> Result<()> {
    let every = Duration::from_secs(interval.unwrap_or(config.sync.interval_secs).max(1));
    let store = context::connect_store(config).await?;
    let orchestrator = Arc::new(context::orchestrator(config, store)?);

    println!(
        "{} every {}s into {} {}",
        "Watching:".bold(),
        every.as_secs(),
        config.cache.redis_url.cyan(),
        "(Ctrl+C to stop)".dimmed()
    );

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });

    let stats = run_scheduled(orchestrator, every, rx).await;
    tracing::info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        skipped = stats.skipped,
        missed = stats.missed,
        "Watch stopped"
    );

    println!();
    println!("{}", "Scheduler stopped:".bold());
    println!("  Succeeded: {}", stats.succeeded.to_string().green());
    println!("  Failed:    {}", stats.failed.to_string().red());
    println!("  Skipped:   {}", stats.skipped.to_string().dimmed());
    println!("  Missed:    {}", stats.missed.to_string().dimmed());

    Ok(())
}
