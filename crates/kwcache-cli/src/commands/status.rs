//! Connectivity status command.

use anyhow::Result;
use colored::Colorize;

use kwcache_core::read_snapshot;
use kwcache_sync::SyncConfig;

use crate::context;

/// Show source and cache health plus the last sync time.
pub async fn execute(config: &SyncConfig) -> Result<()> {
    println!("{}", "Keyword Cache Status".bold());
    println!("{}", "─".repeat(40));

    let source_state = match context::open_db(config) {
        Ok(pool) => match context::keyword_source(config, pool).ping().await {
            Ok(()) => "ok".green(),
            Err(e) => format!("error: {}", e).red(),
        },
        Err(e) => format!("error: {:#}", e).red(),
    };
    println!("  Source:    {} {}", source_state, config.source.database_path.display().to_string().dimmed());

    match context::connect_store(config).await {
        Ok(store) => {
            let cache_state = match store.ping().await {
                Ok(()) => "ok".green(),
                Err(e) => format!("error: {}", e).red(),
            };
            println!("  Cache:     {} {}", cache_state, config.cache.redis_url.dimmed());

            let view = read_snapshot(store.as_ref(), &config.snapshot_keys()).await;
            match view.last_sync.as_deref() {
                Some(time) => println!("  Last sync: {}", time.green()),
                None => println!("  Last sync: {}", "never (or expired)".yellow()),
            }
        }
        Err(e) => println!("  Cache:     {} {}", format!("error: {:#}", e).red(), config.cache.redis_url.dimmed()),
    }

    println!("{}", "─".repeat(40));
    Ok(())
}
