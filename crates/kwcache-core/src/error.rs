//! Per-record error types for the transformation stage.

use thiserror::Error;

/// Errors raised while turning a single keyword record into its cached form.
///
/// These never abort a sync run: the offending record is dropped, counted
/// and logged, and the run continues with the remainder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Invalid category '{category}' for keyword {id}")]
    InvalidCategory { id: i64, category: String },
}

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
    /// Create an invalid category error.
    pub fn invalid_category(id: i64, category: impl Into<String>) -> Self {
        Self::InvalidCategory {
            id,
            category: category.into(),
        }
    }

    /// Id of the record that was rejected.
    pub fn record_id(&self) -> i64 {
        match self {
            Self::InvalidCategory { id, .. } => *id,
        }
    }
}
