//! Cache store abstraction and an in-process implementation.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache error types.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Write to '{key}' failed: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// String-keyed store with per-key expiration.
///
/// Each operation acquires a connection for its own duration only.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Overwrite `key` with `value`, expiring after `ttl_secs`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()>;

    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    async fn ping(&self) -> CacheResult<()>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    failing_keys: HashSet<String>,
}

/// In-memory [`SnapshotStore`].
///
/// Used for dry runs and tests. Writes to keys registered with
/// [`MemoryStore::fail_writes_to`] fail with [`CacheError::WriteFailed`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent write to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.lock().failing_keys.insert(key.to_string());
    }

    /// Stop injecting write failures.
    pub fn clear_failures(&self) {
        self.lock().failing_keys.clear();
    }

    /// Remaining time to live of a live key.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.lock()
            .entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.expires_at - now)
    }

    /// Live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .lock()
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at > now)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> CacheResult<()> {
        let mut inner = self.lock();
        if inner.failing_keys.contains(key) {
            return Err(CacheError::WriteFailed {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut inner = self.lock();
        let expired = match inner.entries.get(key) {
            Some(e) if e.expires_at <= Instant::now() => true,
            Some(e) => return Ok(Some(e.value.clone())),
            None => return Ok(None),
        };
        if expired {
            inner.entries.remove(key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.lock().entries.remove(key);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "v", 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(store.ttl("k").unwrap() <= Duration::from_secs(60));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "v", 0).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let store = MemoryStore::new();
        store.set_with_ttl("k", "old", 60).await.unwrap();
        store.fail_writes_to("k");

        let err = store.set_with_ttl("k", "new", 60).await.unwrap_err();
        assert!(matches!(err, CacheError::WriteFailed { ref key, .. } if key == "k"));
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("old"));

        store.clear_failures();
        store.set_with_ttl("k", "new", 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
