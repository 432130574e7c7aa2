//! Keyword Cache Redis Layer
//!
//! Connection bootstrap and the Redis implementation of
//! [`kwcache_core::SnapshotStore`].

pub mod client;
pub mod store;

pub use client::{init_pool, init_pool_with_timeout, RedisError, RedisPool, RedisResult};
pub use store::RedisStore;
