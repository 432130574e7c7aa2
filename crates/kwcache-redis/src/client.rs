//! Redis connection pool management.

use redis::aio::ConnectionManager;
use thiserror::Error;

/// Redis error types.
#[derive(Error, Debug)]
pub enum RedisError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),
}

/// Result type for Redis operations.
pub type RedisResult<T> = Result<T, RedisError>;

/// Redis connection pool. ConnectionManager multiplexes internally and
/// reconnects on failure; it is Clone, so each operation clones its own handle.
pub type RedisPool = ConnectionManager;

/// Initialize a Redis connection pool from a URL.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn init_pool(redis_url: &str) -> RedisResult<RedisPool> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}

/// Like [`init_pool`], giving up after `timeout`.
pub async fn init_pool_with_timeout(redis_url: &str, timeout: std::time::Duration) -> RedisResult<RedisPool> {
    tokio::time::timeout(timeout, init_pool(redis_url))
        .await
        .map_err(|_| RedisError::ConnectTimeout(redis_url.to_string()))?
}
