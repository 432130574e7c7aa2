//! Network statistics model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::keyword::model::Category;

/// Provenance label written by the sync pipeline.
pub const DATA_SOURCE: &str = "SQLite → Redis Sync";

/// Provenance label of the fallback dataset.
pub const FALLBACK_DATA_SOURCE: &str = "fallback";

/// Aggregate statistics for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_keywords: usize,
    pub active_keywords: usize,
    pub total_connections: i64,
    pub network_density: f64,
    pub category_distribution: BTreeMap<Category, usize>,
    pub last_updated: String,
    pub data_source: String,
}

impl NetworkStats {
    /// Zeroed statistics served when no snapshot is cached.
    pub fn fallback() -> Self {
        Self {
            total_keywords: 0,
            active_keywords: 0,
            total_connections: 0,
            network_density: 0.0,
            category_distribution: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            last_updated: String::new(),
            data_source: FALLBACK_DATA_SOURCE.to_string(),
        }
    }

    /// Count for one category; zero when absent.
    pub fn category_count(&self, category: Category) -> usize {
        self.category_distribution.get(&category).copied().unwrap_or(0)
    }
}
