//! Redis snapshot store.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use kwcache_core::{CacheError, CacheResult, SnapshotStore};

use crate::client::RedisPool;

/// [`SnapshotStore`] over a Redis connection manager.
///
/// Every write is a single `SET key value EX ttl`, so value and expiry
/// land together.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        let mut conn = self.pool.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::WriteFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        debug!(key, bytes = value.len(), ttl_secs, "SET EX");
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.pool.clone();
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.pool.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.pool.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::init_pool;

    /// Needs a running Redis: `REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_set_get_delete_against_live_redis() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
        let store = RedisStore::new(init_pool(&url).await.unwrap());
        store.ping().await.unwrap();

        let key = "kwcache:test:store";
        store.set_with_ttl(key, "value", 30).await.unwrap();
        assert_eq!(store.get(key).await.unwrap().as_deref(), Some("value"));

        store.delete(key).await.unwrap();
        assert_eq!(store.get(key).await.unwrap(), None);
    }
}
