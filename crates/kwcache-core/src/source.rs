//! Read-only access to the relational keyword source.

use async_trait::async_trait;
use thiserror::Error;

use crate::keyword::model::KeywordRecord;

/// Errors raised by a keyword source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source connection error: {0}")]
    Connection(String),

    #[error("Source query failed: {0}")]
    Query(String),
}

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// The Graph Reader contract.
///
/// Returns every active keyword ordered by id ascending, with
/// `subcategory_name`, `category` and `connections` already derived.
/// Inactive keywords never appear in the output.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn fetch_active_keywords(&self) -> SourceResult<Vec<KeywordRecord>>;

    /// Cheap liveness check.
    async fn ping(&self) -> SourceResult<()>;
}
