//! Snapshot key layout and the consumer-side reader.
//!
//! A snapshot is three cache entries: the serialized keyword list, the
//! serialized stats and the last-sync timestamp. Readers must tolerate the
//! entries being absent, expired, or briefly from different generations.

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::SnapshotStore;
use crate::keyword::model::CachedKeyword;
use crate::stats::aggregate;
use crate::stats::model::{NetworkStats, DATA_SOURCE};

pub const DEFAULT_KEY_PREFIX: &str = "keywords";

/// Cache keys of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotKeys {
    pub keywords: String,
    pub stats: String,
    pub last_sync: String,
}

impl SnapshotKeys {
    /// `{prefix}:all`, `{prefix}:stats`, `{prefix}:last_sync`.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            keywords: format!("{}:all", prefix),
            stats: format!("{}:stats", prefix),
            last_sync: format!("{}:last_sync", prefix),
        }
    }

    pub fn all(&self) -> [&str; 3] {
        [&self.keywords, &self.stats, &self.last_sync]
    }
}

impl Default for SnapshotKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Where a [`SnapshotView`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Cache,
    Fallback,
}

/// What a cache consumer sees.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    pub keywords: Vec<CachedKeyword>,
    pub stats: NetworkStats,
    pub last_sync: Option<String>,
    pub source: SnapshotSource,
}

impl SnapshotView {
    /// The documented fallback: no keywords, zeroed stats, never synced.
    pub fn fallback() -> Self {
        Self {
            keywords: Vec::new(),
            stats: NetworkStats::fallback(),
            last_sync: None,
            source: SnapshotSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SnapshotSource::Fallback
    }

    /// True when stats and last-sync belong to the same sync run.
    pub fn generation_consistent(&self) -> bool {
        self.last_sync.as_deref() == Some(self.stats.last_updated.as_str())
    }
}

/// Read the current snapshot, never failing.
///
/// A missing or undecodable keyword list yields the fallback. Missing or
/// undecodable stats are recomputed from the keyword list that was read.
pub async fn read_snapshot(store: &dyn SnapshotStore, keys: &SnapshotKeys) -> SnapshotView {
    let keywords = match store.get(&keys.keywords).await {
        Ok(Some(json)) => match serde_json::from_str::<Vec<CachedKeyword>>(&json) {
            Ok(k) => k,
            Err(e) => {
                warn!(key = %keys.keywords, "Cached keyword list is corrupt, using fallback: {}", e);
                return SnapshotView::fallback();
            }
        },
        Ok(None) => {
            debug!(key = %keys.keywords, "No cached keyword list, using fallback");
            return SnapshotView::fallback();
        }
        Err(e) => {
            warn!(key = %keys.keywords, "Cache read failed, using fallback: {}", e);
            return SnapshotView::fallback();
        }
    };

    let last_sync = match store.get(&keys.last_sync).await {
        Ok(v) => v,
        Err(e) => {
            warn!(key = %keys.last_sync, "Cache read failed: {}", e);
            None
        }
    };

    let cached_stats = match store.get(&keys.stats).await {
        Ok(Some(json)) => serde_json::from_str::<NetworkStats>(&json)
            .map_err(|e| warn!(key = %keys.stats, "Cached stats are corrupt: {}", e))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            warn!(key = %keys.stats, "Cache read failed: {}", e);
            None
        }
    };

    let stats = cached_stats.unwrap_or_else(|| {
        debug!("Recomputing stats from cached keyword list");
        aggregate(&keywords, last_sync.as_deref().unwrap_or_default(), DATA_SOURCE)
    });

    SnapshotView {
        keywords,
        stats,
        last_sync,
        source: SnapshotSource::Cache,
    }
}
