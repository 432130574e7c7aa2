//! Graph Reader over the SQLite keyword database.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use kwcache_core::{CategoryClassifier, KeywordRecord, KeywordSource, SourceError, SourceResult};

use crate::pool::{DbError, DbPool};
use crate::queries::keywords::{self, ActiveKeywordRow};

/// Reads active keywords and derives their category through a classifier.
#[derive(Clone)]
pub struct SqliteKeywordSource {
    pool: DbPool,
    classifier: Arc<dyn CategoryClassifier>,
    resolve_dependencies: bool,
}

impl SqliteKeywordSource {
    pub fn new(pool: DbPool, classifier: Arc<dyn CategoryClassifier>) -> Self {
        Self {
            pool,
            classifier,
            resolve_dependencies: false,
        }
    }

    /// Also attach neighbour ids to each record.
    pub fn with_dependencies(mut self, resolve: bool) -> Self {
        self.resolve_dependencies = resolve;
        self
    }

    fn read_blocking(&self) -> Result<Vec<KeywordRecord>, DbError> {
        let rows = keywords::list_active_keywords(&self.pool)?;

        let mut neighbors = if self.resolve_dependencies {
            let active: HashSet<i64> = rows.iter().map(|r| r.id).collect();
            Some(neighbor_map(&keywords::list_dependency_edges(&self.pool)?, &active))
        } else {
            None
        };

        let records = rows
            .into_iter()
            .map(|row| {
                let ids = neighbors
                    .as_mut()
                    .map(|m| m.remove(&row.id).map(|s| s.into_iter().collect::<Vec<i64>>()).unwrap_or_default());
                self.to_record(row, ids)
            })
            .collect();

        Ok(records)
    }

    fn to_record(&self, row: ActiveKeywordRow, neighbors: Option<Vec<i64>>) -> KeywordRecord {
        let category = self.classifier.classify(&row.subcategory_name);
        KeywordRecord {
            id: row.id,
            text: row.text,
            name: row.name,
            subcategory_id: row.subcategory_id,
            subcategory_name: row.subcategory_name,
            category,
            connections: row.connections,
            is_active: true,
            weight: row.weight,
            neighbors,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Neighbour ids per keyword, restricted to active keywords on both ends.
fn neighbor_map(edges: &[(i64, i64)], active: &HashSet<i64>) -> HashMap<i64, BTreeSet<i64>> {
    let mut map: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for &(parent, dependent) in edges {
        if parent == dependent || !active.contains(&parent) || !active.contains(&dependent) {
            continue;
        }
        map.entry(parent).or_default().insert(dependent);
        map.entry(dependent).or_default().insert(parent);
    }
    map
}

fn to_source_error(e: DbError) -> SourceError {
    match e {
        DbError::Pool(msg) => SourceError::Connection(msg),
        other => SourceError::Query(other.to_string()),
    }
}

#[async_trait]
impl KeywordSource for SqliteKeywordSource {
    async fn fetch_active_keywords(&self) -> SourceResult<Vec<KeywordRecord>> {
        let this = self.clone();
        let records = tokio::task::spawn_blocking(move || this.read_blocking())
            .await
            .map_err(|e| SourceError::Connection(format!("reader task failed: {}", e)))?
            .map_err(to_source_error)?;

        debug!(count = records.len(), "Read active keywords");
        Ok(records)
    }

    async fn ping(&self) -> SourceResult<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            pool.with_conn(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
        })
        .await
        .map_err(|e| SourceError::Connection(format!("ping task failed: {}", e)))?
        .map_err(to_source_error)
    }
}
