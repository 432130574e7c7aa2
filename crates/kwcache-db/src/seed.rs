//! Demo taxonomy for local development.

use tracing::info;

use crate::pool::{DbPool, DbResult};
use crate::queries::keywords::{count_active_keywords, create_dependency, create_keyword, upsert_subcategory};

const SUBCATEGORIES: &[(&str, &[&str])] = &[
    ("A-Foundations", &["storage", "indexing", "caching"]),
    ("A-Networking", &["protocols", "load balancing"]),
    ("B-Analytics", &["dashboards", "trend analysis", "surveys"]),
    ("C-Operations", &["deployment", "monitoring"]),
];

/// `(parent, dependent)` pairs by keyword text.
const DEPENDENCIES: &[(&str, &str)] = &[
    ("storage", "indexing"),
    ("storage", "caching"),
    ("indexing", "dashboards"),
    ("caching", "dashboards"),
    ("protocols", "load balancing"),
    ("dashboards", "trend analysis"),
    ("monitoring", "deployment"),
    ("load balancing", "deployment"),
];

/// Load the demo taxonomy into an empty database.
///
/// Returns the number of keywords inserted; zero when keywords already exist.
pub fn seed_demo(pool: &DbPool) -> DbResult<usize> {
    if count_active_keywords(pool)? > 0 {
        info!("Database already has keywords, skipping seed");
        return Ok(0);
    }

    let mut ids = std::collections::HashMap::new();
    for (subcategory, keywords) in SUBCATEGORIES {
        let sub_id = upsert_subcategory(pool, subcategory)?;
        for text in *keywords {
            let id = create_keyword(pool, text, sub_id, true, None)?;
            ids.insert(*text, id);
        }
    }

    for (parent, dependent) in DEPENDENCIES {
        if let (Some(p), Some(d)) = (ids.get(parent), ids.get(dependent)) {
            create_dependency(pool, *p, *d)?;
        }
    }

    info!(keywords = ids.len(), edges = DEPENDENCIES.len(), "Seeded demo taxonomy");
    Ok(ids.len())
}
