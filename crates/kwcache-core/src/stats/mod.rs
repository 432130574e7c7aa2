//! Network statistics aggregation.

pub mod model;

use std::collections::BTreeMap;

use crate::keyword::model::{CachedKeyword, Category, KeywordStatus};
use model::NetworkStats;

/// Compute statistics over exactly the keywords that will be published.
///
/// Every known category appears in the distribution, with zero when unused.
/// Density is zero for an empty list.
pub fn aggregate(keywords: &[CachedKeyword], last_updated: &str, data_source: &str) -> NetworkStats {
    let total_keywords = keywords.len();
    let active_keywords = keywords
        .iter()
        .filter(|k| k.status == KeywordStatus::Active)
        .count();
    let total_connections: i64 = keywords.iter().map(|k| k.connections).sum();

    let network_density = if total_keywords == 0 {
        0.0
    } else {
        total_connections as f64 / total_keywords as f64
    };

    let mut category_distribution: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();
    for keyword in keywords {
        *category_distribution.entry(keyword.category).or_insert(0) += 1;
    }

    NetworkStats {
        total_keywords,
        active_keywords,
        total_connections,
        network_density,
        category_distribution,
        last_updated: last_updated.to_string(),
        data_source: data_source.to_string(),
    }
}
