//! Cached snapshot CLI commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use kwcache_core::read_snapshot;
use kwcache_sync::SyncConfig;

use crate::context;
use crate::output;

#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Show the cached snapshot (or the fallback when none exists)
    Show {
        /// Also list every cached keyword
        #[arg(long)]
        keywords: bool,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the snapshot keys
    Clear,
}

pub async fn execute(cmd: SnapshotCommands, config: &SyncConfig) -> Result<()> {
    let store = context::connect_store(config).await?;

    match cmd {
        SnapshotCommands::Show { keywords, json } => {
            let view = read_snapshot(store.as_ref(), &config.snapshot_keys()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                output::print_snapshot(&view);
                if keywords {
                    println!();
                    output::print_cached_keywords(&view.keywords);
                }
            }
            Ok(())
        }
        SnapshotCommands::Clear => {
            context::publisher(config, store).clear().await?;
            println!("{}", "Snapshot cleared.".green());
            Ok(())
        }
    }
}
