//! Wiring of the pipeline collaborators from configuration.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use kwcache_core::{KeywordSource, SnapshotStore};
use kwcache_db::{DbPool, SqliteKeywordSource};
use kwcache_redis::RedisStore;
use kwcache_sync::{SnapshotPublisher, SyncConfig, SyncOrchestrator};

const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the keyword database, creating the schema if needed.
pub fn open_db(config: &SyncConfig) -> Result<DbPool> {
    let path = &config.source.database_path;
    kwcache_db::init_pool(path)
        .with_context(|| format!("Failed to open keyword database at {}", path.display()))
}

pub fn keyword_source(config: &SyncConfig, pool: DbPool) -> Arc<dyn KeywordSource> {
    Arc::new(
        SqliteKeywordSource::new(pool, Arc::new(config.classifier()))
            .with_dependencies(config.source.resolve_dependencies),
    )
}

/// Connect to Redis, failing fast when it is unreachable.
pub async fn connect_store(config: &SyncConfig) -> Result<Arc<dyn SnapshotStore>> {
    let pool = kwcache_redis::init_pool_with_timeout(&config.cache.redis_url, REDIS_CONNECT_TIMEOUT)
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", config.cache.redis_url))?;
    Ok(Arc::new(RedisStore::new(pool)))
}

pub fn publisher(config: &SyncConfig, store: Arc<dyn SnapshotStore>) -> SnapshotPublisher {
    SnapshotPublisher::new(store, config.snapshot_keys(), config.cache.ttl_secs)
        .with_write_timeout(config.timeout())
}

/// Build an orchestrator publishing into `store`.
pub fn orchestrator(config: &SyncConfig, store: Arc<dyn SnapshotStore>) -> Result<SyncOrchestrator> {
    let pool = open_db(config)?;
    let source = keyword_source(config, pool);
    Ok(SyncOrchestrator::new(source, publisher(config, store)).with_timeout(config.timeout()))
}
