//! Keyword transformation: relational records to cached keywords.
//!
//! Everything here is pure. The only input besides the record is the
//! weight strategy and the sync timestamp of the current run.

pub mod category;
pub mod model;
pub mod weight;

use tracing::warn;

use crate::error::{TransformError, TransformResult};
use model::{CachedKeyword, Category, KeywordRecord, KeywordStatus};
use weight::WeightStrategy;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Output of a transformation pass.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub keywords: Vec<CachedKeyword>,
    pub rejected: Vec<TransformError>,
}

/// Transform a single record.
///
/// Fails with [`TransformError::InvalidCategory`] when the derived category
/// is not one of the known letters.
pub fn transform_record(
    record: &KeywordRecord,
    weights: &dyn WeightStrategy,
    synced_at: &str,
) -> TransformResult<CachedKeyword> {
    let category = Category::from_letter(&record.category)
        .ok_or_else(|| TransformError::invalid_category(record.id, record.category.as_str()))?;

    let name = record
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(&record.text)
        .to_string();

    let weight = record
        .weight
        .filter(|w| w.is_finite())
        .unwrap_or_else(|| weights.weight_for(record.id));

    let mut dependencies = record.neighbors.clone().unwrap_or_default();
    dependencies.sort_unstable();
    dependencies.dedup();

    Ok(CachedKeyword {
        id: record.id,
        name,
        text: record.text.clone(),
        category,
        subcategory: record.subcategory_name.clone(),
        subcategory_name: record.subcategory_name.clone(),
        weight,
        connections: record.connections,
        status: KeywordStatus::from_active(record.is_active),
        dependencies,
        color: category.color().to_string(),
        position: Some(position_hint(category, record.id, record.connections)),
        created_at: record.created_at.clone().unwrap_or_else(|| synced_at.to_string()),
        updated_at: record.updated_at.clone().unwrap_or_else(|| synced_at.to_string()),
    })
}

/// Transform every record, dropping and collecting the ones that fail.
///
/// Output order follows input order.
pub fn transform_all(
    records: &[KeywordRecord],
    weights: &dyn WeightStrategy,
    synced_at: &str,
) -> TransformOutput {
    let mut output = TransformOutput {
        keywords: Vec::with_capacity(records.len()),
        rejected: Vec::new(),
    };

    for record in records {
        match transform_record(record, weights, synced_at) {
            Ok(keyword) => output.keywords.push(keyword),
            Err(e) => {
                warn!(keyword_id = record.id, category = %record.category, "Rejected keyword: {}", e);
                output.rejected.push(e);
            }
        }
    }

    output
}

/// Deterministic layout hint: a cluster per category, a spiral inside it.
///
/// Better-connected keywords sit higher on the y axis.
fn position_hint(category: Category, id: i64, connections: i64) -> [f64; 3] {
    let center = match category {
        Category::A => [-10.0, 0.0, 0.0],
        Category::B => [10.0, 0.0, 0.0],
        Category::C => [0.0, 0.0, 10.0],
    };
    let theta = id as f64 * GOLDEN_ANGLE;
    let radius = 2.0 + (id.rem_euclid(16)) as f64 * 0.5;
    let lift = (connections.max(0) as f64).sqrt();

    [
        center[0] + radius * theta.cos(),
        center[1] + lift,
        center[2] + radius * theta.sin(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use weight::FixedWeight;

    const NOW: &str = "2026-10-17T00:00:00+00:00";

    fn record(id: i64, category: &str) -> KeywordRecord {
        KeywordRecord::new(id, format!("kw{}", id), 1, format!("{}-sub", category), category, id)
    }

    #[test]
    fn test_transform_maps_fields() {
        let mut r = record(3, "B");
        r.name = Some("Display".to_string());
        let kw = transform_record(&r, &FixedWeight(6.5), NOW).unwrap();

        assert_eq!(kw.id, 3);
        assert_eq!(kw.name, "Display");
        assert_eq!(kw.text, "kw3");
        assert_eq!(kw.category, Category::B);
        assert_eq!(kw.color, "#8B5CF6");
        assert_eq!(kw.subcategory, "B-sub");
        assert_eq!(kw.subcategory_name, "B-sub");
        assert_eq!(kw.weight, 6.5);
        assert_eq!(kw.connections, 3);
        assert_eq!(kw.status, KeywordStatus::Active);
        assert!(kw.dependencies.is_empty());
        assert_eq!(kw.created_at, NOW);
        assert_eq!(kw.updated_at, NOW);
    }

    #[test]
    fn test_name_falls_back_to_text() {
        let mut r = record(1, "A");
        r.name = Some("  ".to_string());
        let kw = transform_record(&r, &FixedWeight(5.0), NOW).unwrap();
        assert_eq!(kw.name, "kw1");
    }

    #[test]
    fn test_source_weight_and_timestamps_win() {
        let mut r = record(1, "C");
        r.weight = Some(0.25);
        r.created_at = Some("2020-01-01T00:00:00+00:00".to_string());
        let kw = transform_record(&r, &FixedWeight(5.0), NOW).unwrap();
        assert_eq!(kw.weight, 0.25);
        assert_eq!(kw.created_at, "2020-01-01T00:00:00+00:00");
        assert_eq!(kw.updated_at, NOW);
    }

    #[test]
    fn test_neighbors_sorted_and_deduplicated() {
        let mut r = record(5, "A");
        r.neighbors = Some(vec![9, 2, 9, 4]);
        let kw = transform_record(&r, &FixedWeight(5.0), NOW).unwrap();
        assert_eq!(kw.dependencies, vec![2, 4, 9]);
    }

    #[test]
    fn test_invalid_category_is_rejected() {
        let err = transform_record(&record(8, "D"), &FixedWeight(5.0), NOW).unwrap_err();
        assert_eq!(err, TransformError::invalid_category(8, "D"));
    }

    #[test]
    fn test_transform_all_drops_only_bad_records() {
        let records = vec![record(1, "A"), record(2, "Z"), record(3, "C"), record(4, "")];
        let out = transform_all(&records, &FixedWeight(5.0), NOW);

        let ids: Vec<i64> = out.keywords.iter().map(|k| k.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let rejected: Vec<i64> = out.rejected.iter().map(|e| e.record_id()).collect();
        assert_eq!(rejected, vec![2, 4]);
    }

    #[test]
    fn test_position_is_deterministic() {
        let r = record(11, "B");
        let a = transform_record(&r, &FixedWeight(5.0), NOW).unwrap();
        let b = transform_record(&r, &FixedWeight(5.0), NOW).unwrap();
        assert_eq!(a.position, b.position);
        assert!(a.position.is_some());
    }
}
