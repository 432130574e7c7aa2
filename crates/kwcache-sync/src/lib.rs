//! # Keyword Cache Sync
//!
//! Mirrors the relational keyword graph into the cache: Graph Reader,
//! Graph Transformer, Stats Aggregator and Snapshot Publisher, driven by
//! the Sync Orchestrator on demand or on a schedule.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use scheduler::{run_scheduled, spawn_scheduler, ScheduleStats};
pub use sync::publisher::SnapshotPublisher;
pub use sync::{SyncOrchestrator, SyncPhase, SyncSummary};
