//! Keyword Cache Database Layer
//!
//! SQLite-backed relational source for the keyword graph: schema
//! migrations, keyword queries and the [`SqliteKeywordSource`] reader.

pub mod migrations;
pub mod pool;
pub mod queries;
pub mod seed;
pub mod source;

pub use pool::{init_pool, DbError, DbPool, DbResult};
pub use source::SqliteKeywordSource;
