//! Weight assignment for cached keywords.

use rand::Rng;

/// Lower bound of the placeholder weight range.
pub const PLACEHOLDER_MIN: f64 = 4.0;
/// Upper bound (exclusive) of the placeholder weight range.
pub const PLACEHOLDER_MAX: f64 = 12.0;

/// Produces a weight for keywords whose source row has none.
pub trait WeightStrategy: Send + Sync {
    fn weight_for(&self, keyword_id: i64) -> f64;
}

/// Non-deterministic pseudo-random weight in `[4.0, 12.0)`.
///
/// This is a stand-in with no semantic meaning. Two runs over the same
/// source produce different weights; tests must not assert on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderWeight;

impl WeightStrategy for PlaceholderWeight {
    fn weight_for(&self, _keyword_id: i64) -> f64 {
        rand::rng().random_range(PLACEHOLDER_MIN..PLACEHOLDER_MAX)
    }
}

/// Same weight for every keyword.
#[derive(Debug, Clone, Copy)]
pub struct FixedWeight(pub f64);

impl WeightStrategy for FixedWeight {
    fn weight_for(&self, _keyword_id: i64) -> f64 {
        self.0
    }
}
