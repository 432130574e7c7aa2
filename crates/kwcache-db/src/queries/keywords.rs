//! Keyword-related database queries.

use crate::pool::{DbError, DbPool, DbResult};
use rusqlite::{params, OptionalExtension};

/// Active keyword joined with its subcategory and connection count.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveKeywordRow {
    pub id: i64,
    pub text: String,
    pub name: Option<String>,
    pub subcategory_id: i64,
    pub subcategory_name: String,
    pub connections: i64,
    pub weight: Option<f64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// List every active keyword, ordered by id.
///
/// `connections` counts the dependency edges touching the keyword at
/// either endpoint.
pub fn list_active_keywords(pool: &DbPool) -> DbResult<Vec<ActiveKeywordRow>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT k.id, k.text, k.name, k.subcategory_id, ksc.name,
                    (SELECT COUNT(*) FROM keyword_dependencies kd
                     WHERE kd.parent_keyword_id = k.id OR kd.dependent_keyword_id = k.id) AS connections,
                    k.weight, k.created_at, k.updated_at
             FROM keywords k
             JOIN keyword_subcategories ksc ON k.subcategory_id = ksc.id
             WHERE k.is_active = 1
             ORDER BY k.id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ActiveKeywordRow {
                id: row.get(0)?,
                text: row.get(1)?,
                name: row.get(2)?,
                subcategory_id: row.get(3)?,
                subcategory_name: row.get(4)?,
                connections: row.get(5)?,
                weight: row.get(6)?,
                created_at: row.get(7)?,
                updated_at: row.get(8)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// List every dependency edge as `(parent, dependent)`.
pub fn list_dependency_edges(pool: &DbPool) -> DbResult<Vec<(i64, i64)>> {
    pool.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT parent_keyword_id, dependent_keyword_id
             FROM keyword_dependencies
             ORDER BY parent_keyword_id, dependent_keyword_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    })
}

/// Count active keywords.
pub fn count_active_keywords(pool: &DbPool) -> DbResult<i64> {
    pool.with_conn(|conn| {
        let count = conn.query_row("SELECT COUNT(*) FROM keywords WHERE is_active = 1", [], |row| row.get(0))?;
        Ok(count)
    })
}

/// Insert a subcategory, returning its id. Existing names are reused.
pub fn upsert_subcategory(pool: &DbPool, name: &str) -> DbResult<i64> {
    pool.with_conn(|conn| {
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM keyword_subcategories WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        conn.execute("INSERT INTO keyword_subcategories (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    })
}

/// Insert a keyword, returning its id.
pub fn create_keyword(
    pool: &DbPool,
    text: &str,
    subcategory_id: i64,
    is_active: bool,
    weight: Option<f64>,
) -> DbResult<i64> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT INTO keywords (text, subcategory_id, is_active, weight) VALUES (?1, ?2, ?3, ?4)",
            params![text, subcategory_id, is_active, weight],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Record that `dependent` depends on `parent`.
pub fn create_dependency(pool: &DbPool, parent_id: i64, dependent_id: i64) -> DbResult<()> {
    pool.with_conn(|conn| {
        conn.execute(
            "INSERT OR IGNORE INTO keyword_dependencies (parent_keyword_id, dependent_keyword_id)
             VALUES (?1, ?2)",
            params![parent_id, dependent_id],
        )?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        run_migrations(&pool).unwrap();
        pool
    }

    #[test]
    fn test_connections_count_both_endpoints() {
        let pool = pool();
        let a = upsert_subcategory(&pool, "A-core").unwrap();
        let b = upsert_subcategory(&pool, "B-tools").unwrap();
        let k1 = create_keyword(&pool, "one", a, true, None).unwrap();
        let k2 = create_keyword(&pool, "two", a, true, None).unwrap();
        let k3 = create_keyword(&pool, "three", b, true, None).unwrap();
        create_dependency(&pool, k3, k1).unwrap();
        create_dependency(&pool, k2, k3).unwrap();

        let rows = list_active_keywords(&pool).unwrap();
        let connections: Vec<i64> = rows.iter().map(|r| r.connections).collect();
        assert_eq!(connections, vec![1, 1, 2]);
        assert_eq!(rows[2].subcategory_name, "B-tools");
    }

    #[test]
    fn test_inactive_keywords_excluded() {
        let pool = pool();
        let a = upsert_subcategory(&pool, "A-core").unwrap();
        let k1 = create_keyword(&pool, "one", a, true, None).unwrap();
        let k2 = create_keyword(&pool, "two", a, false, None).unwrap();
        create_dependency(&pool, k1, k2).unwrap();

        let rows = list_active_keywords(&pool).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, k1);
        // Edges to inactive keywords still count
        assert_eq!(rows[0].connections, 1);
        assert_eq!(count_active_keywords(&pool).unwrap(), 1);
    }

    #[test]
    fn test_rows_ordered_by_id() {
        let pool = pool();
        let a = upsert_subcategory(&pool, "A-core").unwrap();
        for text in ["z", "y", "x"] {
            create_keyword(&pool, text, a, true, None).unwrap();
        }
        let ids: Vec<i64> = list_active_keywords(&pool).unwrap().iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_upsert_subcategory_reuses_name() {
        let pool = pool();
        let first = upsert_subcategory(&pool, "C-misc").unwrap();
        let second = upsert_subcategory(&pool, "C-misc").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_dependency_ignored() {
        let pool = pool();
        let a = upsert_subcategory(&pool, "A-core").unwrap();
        let k1 = create_keyword(&pool, "one", a, true, None).unwrap();
        let k2 = create_keyword(&pool, "two", a, true, None).unwrap();
        create_dependency(&pool, k1, k2).unwrap();
        create_dependency(&pool, k1, k2).unwrap();
        assert_eq!(list_dependency_edges(&pool).unwrap(), vec![(k1, k2)]);
    }
}
