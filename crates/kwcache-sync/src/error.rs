//! Pipeline-stage error types.

use std::time::Duration;
use thiserror::Error;

use kwcache_core::{CacheError, SourceError};

/// Errors that end a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The relational read failed. Nothing was written.
    #[error("Keyword source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// A publish write failed. Earlier writes of this run may be visible.
    #[error("Cache write to '{key}' failed: {source}")]
    CacheWriteFailed {
        key: String,
        #[source]
        source: CacheError,
    },

    /// Another run is in flight. Not a pipeline failure.
    #[error("A sync run is already in progress")]
    ConcurrentRunRejected,

    /// The read stages did not finish in time. Nothing was written.
    #[error("Sync run timed out after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// True for outcomes that are scheduling decisions rather than failures.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::ConcurrentRunRejected)
    }
}
