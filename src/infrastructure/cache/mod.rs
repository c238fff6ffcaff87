//! Caching layer for external product lookups.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`MemoryCache`] - In-process TTL map, used when Redis is not configured
//! - [`RedisCache`] - Redis-backed cache
//!
//! [`cache_or_fetch`] wraps any async producer with read-through caching.

mod memory_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService, cache_key, cache_or_fetch};

#[cfg(test)]
pub use service::MockCacheService;
