//! Periodic sync trigger.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::sync::SyncOrchestrator;

/// Outcome counters of a scheduler loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Ticks rejected because a run started elsewhere (CLI, another task) was in flight.
    pub skipped: u64,
    /// Ticks that elapsed while this loop's own run was in progress and were dropped.
    pub missed: u64,
}

/// Trigger `orchestrator` every `every` until `shutdown` flips to true.
///
/// The first run fires immediately. Ticks that land while a run is still
/// in flight are skipped, never queued: rejected ticks count as `skipped`,
/// ticks swallowed by this loop's own run count as `missed`.
pub async fn run_scheduled(
    orchestrator: Arc<SyncOrchestrator>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> ScheduleStats {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats = ScheduleStats::default();

    info!(interval_secs = every.as_secs(), "Scheduler started");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                let started = Instant::now();
                let outcome = orchestrator.run_once().await;
                let missed = missed_ticks(started.elapsed(), every);
                if missed > 0 {
                    debug!(missed, "Ticks elapsed during run were dropped");
                    stats.missed += missed;
                }
                match outcome {
                    Ok(_) => stats.succeeded += 1,
                    Err(e) if e.is_noop() => {
                        debug!("Scheduled tick skipped: run in progress");
                        stats.skipped += 1;
                    }
                    Err(e) => {
                        warn!("Scheduled sync failed, retrying next tick: {}", e);
                        stats.failed += 1;
                    }
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        skipped = stats.skipped,
        missed = stats.missed,
        "Scheduler stopped"
    );
    stats
}

fn missed_ticks(run: Duration, every: Duration) -> u64 {
    if every.is_zero() {
        return 0;
    }
    (run.as_nanos() / every.as_nanos()) as u64
}

/// Spawn [`run_scheduled`] on the runtime.
pub fn spawn_scheduler(
    orchestrator: Arc<SyncOrchestrator>,
    every: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<ScheduleStats> {
    tokio::spawn(run_scheduled(orchestrator, every, shutdown))
}
