//! Database query implementations.

pub mod keywords;
