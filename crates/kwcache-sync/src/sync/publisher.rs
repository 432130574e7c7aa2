//! Snapshot Publisher.
//!
//! Writes keyword list, stats and last-sync timestamp, in that order, each
//! with the same expiration. There is no multi-key transaction: a failure
//! part-way leaves earlier writes of this run next to older entries, and
//! readers see mixed generations until the next successful run.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use kwcache_core::{CacheError, CachedKeyword, NetworkStats, SnapshotKeys, SnapshotStore};

use crate::error::{SyncError, SyncResult};

/// Publishes snapshots into a [`SnapshotStore`].
#[derive(Clone)]
pub struct SnapshotPublisher {
    store: Arc<dyn SnapshotStore>,
    keys: SnapshotKeys,
    ttl_secs: u64,
    write_timeout: Duration,
}

impl SnapshotPublisher {
    pub fn new(store: Arc<dyn SnapshotStore>, keys: SnapshotKeys, ttl_secs: u64) -> Self {
        Self {
            store,
            keys,
            ttl_secs,
            write_timeout: Duration::from_secs(10),
        }
    }

    /// Upper bound on each individual write.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Publish one snapshot generation.
    ///
    /// Both blobs are serialized before the first write, so a serialization
    /// failure never leaves a partial snapshot behind.
    pub async fn publish(
        &self,
        keywords: &[CachedKeyword],
        stats: &NetworkStats,
        synced_at: &str,
    ) -> SyncResult<()> {
        let keywords_json = serde_json::to_string(keywords)?;
        let stats_json = serde_json::to_string(stats)?;

        self.write(&self.keys.keywords, &keywords_json).await?;
        self.write(&self.keys.stats, &stats_json).await?;
        self.write(&self.keys.last_sync, synced_at).await?;

        info!(
            keywords = keywords.len(),
            bytes = keywords_json.len() + stats_json.len(),
            ttl_secs = self.ttl_secs,
            "Snapshot published"
        );
        Ok(())
    }

    /// Remove every snapshot key.
    pub async fn clear(&self) -> SyncResult<()> {
        for key in self.keys.all() {
            self.store.delete(key).await.map_err(|source| SyncError::CacheWriteFailed {
                key: key.to_string(),
                source,
            })?;
        }
        info!("Snapshot cleared");
        Ok(())
    }

    async fn write(&self, key: &str, value: &str) -> SyncResult<()> {
        let result = tokio::time::timeout(
            self.write_timeout,
            self.store.set_with_ttl(key, value, self.ttl_secs),
        )
        .await
        .unwrap_or_else(|_| {
            Err(CacheError::WriteFailed {
                key: key.to_string(),
                reason: format!("timed out after {:?}", self.write_timeout),
            })
        });

        result.map_err(|source| SyncError::CacheWriteFailed {
            key: key.to_string(),
            source,
        })?;
        debug!(key, "Wrote snapshot entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwcache_core::{aggregate, read_snapshot, transform_all, FixedWeight, KeywordRecord, MemoryStore};

    const NOW: &str = "2026-10-17T00:00:00+00:00";

    fn snapshot(n: i64) -> (Vec<CachedKeyword>, NetworkStats) {
        let records: Vec<KeywordRecord> = (1..=n)
            .map(|id| KeywordRecord::new(id, format!("kw{}", id), 1, "A-x", "A", 0))
            .collect();
        let keywords = transform_all(&records, &FixedWeight(5.0), NOW).keywords;
        let stats = aggregate(&keywords, NOW, "test");
        (keywords, stats)
    }

    #[tokio::test]
    async fn test_publish_writes_three_keys_with_ttl() {
        let store = Arc::new(MemoryStore::new());
        let publisher = SnapshotPublisher::new(store.clone(), SnapshotKeys::default(), 3600);
        let (keywords, stats) = snapshot(2);

        publisher.publish(&keywords, &stats, NOW).await.unwrap();

        assert_eq!(store.keys(), vec!["keywords:all", "keywords:last_sync", "keywords:stats"]);
        for key in SnapshotKeys::default().all() {
            let ttl = store.ttl(key).unwrap();
            assert!(ttl > Duration::from_secs(3590) && ttl <= Duration::from_secs(3600));
        }
        assert_eq!(store.get("keywords:last_sync").await.unwrap().as_deref(), Some(NOW));
    }

    #[tokio::test]
    async fn test_stats_write_failure_after_keyword_write() {
        let store = Arc::new(MemoryStore::new());
        let keys = SnapshotKeys::default();
        let publisher = SnapshotPublisher::new(store.clone(), keys.clone(), 3600);

        let (old_kw, old_stats) = snapshot(1);
        publisher.publish(&old_kw, &old_stats, "old").await.unwrap();

        store.fail_writes_to(&keys.stats);
        let (new_kw, new_stats) = snapshot(3);
        let err = publisher.publish(&new_kw, &new_stats, NOW).await.unwrap_err();
        assert!(matches!(err, SyncError::CacheWriteFailed { ref key, .. } if key == "keywords:stats"));

        // New keyword list next to old stats and old last-sync
        let view = read_snapshot(store.as_ref(), &keys).await;
        assert_eq!(view.keywords.len(), 3);
        assert_eq!(view.stats.total_keywords, 1);
        assert_eq!(view.last_sync.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_clear_removes_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let publisher = SnapshotPublisher::new(store.clone(), SnapshotKeys::default(), 60);
        let (keywords, stats) = snapshot(1);
        publisher.publish(&keywords, &stats, NOW).await.unwrap();

        publisher.clear().await.unwrap();
        assert!(store.keys().is_empty());
    }
}
