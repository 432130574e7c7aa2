//! Relational source CLI commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use kwcache_sync::SyncConfig;

use crate::context;
use crate::output;

#[derive(Subcommand)]
pub enum SourceCommands {
    /// Create the keyword schema
    Init,

    /// Load a small demo taxonomy into an empty database
    Seed,

    /// List active keywords as the sync would read them
    List,
}

pub async fn execute(cmd: SourceCommands, config: &SyncConfig) -> Result<()> {
    let pool = context::open_db(config)?;

    match cmd {
        SourceCommands::Init => {
            println!(
                "{} {}",
                "Schema ready at".green(),
                config.source.database_path.display().to_string().cyan()
            );
            Ok(())
        }
        SourceCommands::Seed => {
            let inserted = kwcache_db::seed::seed_demo(&pool)?;
            if inserted == 0 {
                println!("{}", "Database already has keywords; nothing seeded.".dimmed());
            } else {
                println!("{} {} keywords", "Seeded".green(), inserted.to_string().bold());
            }
            Ok(())
        }
        SourceCommands::List => {
            let records = context::keyword_source(config, pool).fetch_active_keywords().await?;
            output::print_records(&records);
            Ok(())
        }
    }
}
