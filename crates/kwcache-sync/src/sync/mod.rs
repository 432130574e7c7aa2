//! Relational keyword graph to cache synchronization pipeline.
//!
//! Reads active keywords, transforms them, aggregates network statistics
//! and publishes the snapshot. Each run is computed from scratch; nothing
//! is read back from the cache.

pub mod publisher;

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use kwcache_core::{
    aggregate, transform_all, CachedKeyword, Category, KeywordSource, NetworkStats, PlaceholderWeight,
    TransformError, WeightStrategy,
};
use kwcache_core::stats::model::DATA_SOURCE;

use crate::error::{SyncError, SyncResult};
use publisher::SnapshotPublisher;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Reading,
    Transforming,
    Aggregating,
    Publishing,
    Done,
    Failed,
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub run_id: Uuid,
    pub synced_at: String,
    pub total_keywords: usize,
    pub active_keywords: usize,
    pub total_connections: i64,
    pub network_density: f64,
    pub category_distribution: BTreeMap<Category, usize>,
    pub rejected: usize,
    pub rejected_ids: Vec<i64>,
    pub duration_ms: u64,
}

struct BuiltSnapshot {
    keywords: Vec<CachedKeyword>,
    stats: NetworkStats,
    rejected: Vec<TransformError>,
}

/// Runs the pipeline on demand, at most one run at a time.
pub struct SyncOrchestrator {
    source: Arc<dyn KeywordSource>,
    publisher: SnapshotPublisher,
    weights: Arc<dyn WeightStrategy>,
    timeout: Duration,
    in_flight: Mutex<()>,
    phase: watch::Sender<SyncPhase>,
}

impl SyncOrchestrator {
    pub fn new(source: Arc<dyn KeywordSource>, publisher: SnapshotPublisher) -> Self {
        let (phase, _rx) = watch::channel(SyncPhase::Idle);
        Self {
            source,
            publisher,
            weights: Arc::new(PlaceholderWeight),
            timeout: Duration::from_secs(30),
            in_flight: Mutex::new(()),
            phase,
        }
    }

    /// Weight strategy for keywords without a source weight.
    pub fn with_weights(mut self, weights: Arc<dyn WeightStrategy>) -> Self {
        self.weights = weights;
        self
    }

    /// Deadline for the read, transform and aggregate stages.
    ///
    /// Publishing is not covered: each of its three writes is bounded by the
    /// publisher's write timeout instead. With the CLI wiring both are
    /// `timeout_secs`, so a run can last up to four times that.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Run sync now.
    ///
    /// Returns [`SyncError::ConcurrentRunRejected`] without doing anything
    /// when another run holds the orchestrator.
    pub async fn run_once(&self) -> SyncResult<SyncSummary> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            debug!("Sync already running, trigger ignored");
            return Err(SyncError::ConcurrentRunRejected);
        };

        let run_id = Uuid::new_v4();
        let span = info_span!("sync_run", %run_id);
        let result = self.run_pipeline(run_id).instrument(span).await;

        match &result {
            Ok(summary) => {
                self.set_phase(SyncPhase::Done);
                info!(
                    %run_id,
                    total = summary.total_keywords,
                    active = summary.active_keywords,
                    connections = summary.total_connections,
                    density = %format!("{:.2}", summary.network_density),
                    a = summary.category_distribution.get(&Category::A).copied().unwrap_or(0),
                    b = summary.category_distribution.get(&Category::B).copied().unwrap_or(0),
                    c = summary.category_distribution.get(&Category::C).copied().unwrap_or(0),
                    rejected = summary.rejected,
                    duration_ms = summary.duration_ms,
                    "Sync complete"
                );
            }
            Err(e) => {
                self.set_phase(SyncPhase::Failed);
                error!(%run_id, "Sync failed: {}", e);
            }
        }

        self.set_phase(SyncPhase::Idle);
        result
    }

    async fn run_pipeline(&self, run_id: Uuid) -> SyncResult<SyncSummary> {
        let started = Instant::now();
        let synced_at = chrono::Utc::now().to_rfc3339();
        info!("Starting keyword sync");

        let built = tokio::time::timeout(self.timeout, self.build_snapshot(&synced_at))
            .await
            .map_err(|_| SyncError::Timeout(self.timeout))??;

        // Publication is never cancelled part-way; each write has its own bound.
        self.set_phase(SyncPhase::Publishing);
        self.publisher
            .publish(&built.keywords, &built.stats, &synced_at)
            .await?;

        let stats = built.stats;
        Ok(SyncSummary {
            run_id,
            synced_at,
            total_keywords: stats.total_keywords,
            active_keywords: stats.active_keywords,
            total_connections: stats.total_connections,
            network_density: stats.network_density,
            category_distribution: stats.category_distribution,
            rejected: built.rejected.len(),
            rejected_ids: built.rejected.iter().map(|e| e.record_id()).collect(),
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn build_snapshot(&self, synced_at: &str) -> SyncResult<BuiltSnapshot> {
        self.set_phase(SyncPhase::Reading);
        let records = self.source.fetch_active_keywords().await?;
        debug!(records = records.len(), "Read stage done");

        self.set_phase(SyncPhase::Transforming);
        let output = transform_all(&records, self.weights.as_ref(), synced_at);

        self.set_phase(SyncPhase::Aggregating);
        let stats = aggregate(&output.keywords, synced_at, DATA_SOURCE);

        Ok(BuiltSnapshot {
            keywords: output.keywords,
            stats,
            rejected: output.rejected,
        })
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }
}
