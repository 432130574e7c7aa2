//! Keyword Cache Core Library
//!
//! Domain models and the pure stages of the keyword cache sync pipeline:
//! classification, transformation and network statistics. The relational
//! source and the cache store are reached only through the traits in
//! [`source`] and [`cache`].

pub mod cache;
pub mod error;
pub mod keyword;
pub mod snapshot;
pub mod source;
pub mod stats;

pub use cache::{CacheError, CacheResult, MemoryStore, SnapshotStore};
pub use error::{TransformError, TransformResult};
pub use keyword::category::{CategoryClassifier, PrefixClassifier};
pub use keyword::model::{CachedKeyword, Category, KeywordRecord, KeywordStatus};
pub use keyword::weight::{FixedWeight, PlaceholderWeight, WeightStrategy};
pub use keyword::{transform_all, transform_record, TransformOutput};
pub use snapshot::{read_snapshot, SnapshotKeys, SnapshotSource, SnapshotView};
pub use source::{KeywordSource, SourceError, SourceResult};
pub use stats::model::NetworkStats;
pub use stats::aggregate;
