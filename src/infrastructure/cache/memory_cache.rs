//! In-process TTL cache.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

struct Entry {
    value: Value,
    expires_at: Instant,
}

/// Cache backed by a `HashMap` behind an async `RwLock`.
///
/// Expired entries are never returned. They are dropped when a read finds
/// them or when [`MemoryCache::purge_expired`] runs; nothing else evicts.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Removes every expired entry and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Another writer may have refreshed the entry between the two locks.
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            debug!(key, "Dropped expired cache entry");
        }
        Ok(None)
    }

    async fn set_json(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::OperationError(format!("TTL out of range: {ttl:?}")))?;
        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_value_returned_unchanged_within_ttl() {
        let cache = MemoryCache::new(Duration::from_secs(30));
        let value = json!({ "name": "Arroz", "tags": ["cereal"] });

        cache.set_json("k", value.clone(), None).await.unwrap();
        tokio::time::advance(Duration::from_secs(29)).await;

        assert_eq!(cache.get_json("k").await.unwrap(), Some(value));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_not_returned_at_expiry() {
        let cache = MemoryCache::new(Duration::from_secs(30));
        cache
            .set_json("k", json!(1), Some(Duration::from_secs(5)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.get_json("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache
            .set_json("short", json!(1), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache.set_json("long", json!(2), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get_json("long").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_is_an_error() {
        let cache = MemoryCache::new(Duration::from_secs(60));

        let result = cache.set_json("k", json!(1), Some(Duration::MAX)).await;

        assert!(matches!(result, Err(CacheError::OperationError(_))));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.set_json("k", json!("v"), None).await.unwrap();
        cache.invalidate("k").await.unwrap();

        assert_eq!(cache.get_json("k").await.unwrap(), None);
        assert!(cache.health_check().await);
    }
}
