//! Cache service trait, error types and the cache-or-fetch wrapper.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache of JSON documents with per-entry expiry.
///
/// Implementations must never return an entry past its expiry. Backends that
/// can fail at runtime (Redis) log the failure and behave like a miss.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process map with lazy expiry
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache using `SETEX`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the live value stored under `key`, if any.
    async fn get_json(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Stores `value` under `key`. `None` uses the backend's default TTL.
    async fn set_json(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()>;

    /// Removes `key` if present.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

/// Joins `prefix` and `parts` with `:`.
///
/// ```
/// use pantry_api::infrastructure::cache::cache_key;
/// assert_eq!(cache_key("barcode", &["737628064502"]), "barcode:737628064502");
/// ```
pub fn cache_key(prefix: &str, parts: &[&str]) -> String {
    let mut key = prefix.to_string();
    for part in parts {
        key.push(':');
        key.push_str(part);
    }
    key
}

/// Returns the cached value for `key`, or runs `producer` and caches its result.
///
/// A hit is returned unchanged and `producer` is not run. On a miss the
/// producer's value is stored with `ttl` before being returned. A failing
/// producer propagates its error and leaves the cache untouched, so the next
/// call tries again.
///
/// Cache backend errors never fail the call: they are logged and the value is
/// produced as if the entry were missing.
pub async fn cache_or_fetch<T, E, F, Fut>(
    cache: &dyn CacheService,
    key: &str,
    ttl: Option<Duration>,
    producer: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cache.get_json(key).await {
        Ok(Some(cached)) => match serde_json::from_value::<T>(cached) {
            Ok(value) => {
                debug!(key, "Cache HIT");
                metrics::counter!("cache_requests_total", "result" => "hit").increment(1);
                return Ok(value);
            }
            Err(e) => warn!(key, error = %e, "Discarding undecodable cache entry"),
        },
        Ok(None) => debug!(key, "Cache MISS"),
        Err(e) => warn!(key, error = %e, "Cache read failed"),
    }
    metrics::counter!("cache_requests_total", "result" => "miss").increment(1);

    let value = producer().await?;

    match serde_json::to_value(&value) {
        Ok(json) => {
            if let Err(e) = cache.set_json(key, json, ttl).await {
                warn!(key, error = %e, "Cache write failed");
            }
        }
        Err(e) => warn!(key, error = %e, "Value is not cacheable"),
    }

    Ok(value)
}
