//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for the volatile cache: URL entries plus per-key click counters.
///
/// The cache is never authoritative. A URL entry and its counter expire
/// independently, and either may be missing for a link that still exists in
/// the persistent store; callers reconcile lazily on the next miss.
///
/// Implementations must be thread-safe and handle errors gracefully without
/// disrupting the application (cache failures degrade to store lookups).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache used when
///   Redis is not configured, and in tests
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the target URL for a short key from cache.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>>;

    /// Stores a URL mapping in cache with optional TTL.
    ///
    /// # Arguments
    ///
    /// - `short_key` - The short key
    /// - `target_url` - The full URL to cache
    /// - `ttl_seconds` - Optional TTL in seconds (implementation default if None)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log
    /// errors and return `Ok(())` to avoid disrupting the request flow.
    async fn set_url(
        &self,
        short_key: &str,
        target_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Atomically increments the click counter for a key and returns the new
    /// value, creating the counter at 1 if absent.
    ///
    /// The increment must be a single store-side operation, not an
    /// application-level read-modify-write: concurrent redirects for a
    /// popular link race on the same counter. The counter's TTL is refreshed
    /// on every increment.
    ///
    /// Returns `Ok(0)` on error (fail-open); callers skip checkpointing on
    /// zero.
    async fn increment_clicks(&self, short_key: &str) -> CacheResult<u64>;

    /// Seeds the click counter from the authoritative count, only if no live
    /// counter exists.
    ///
    /// Must be an atomic set-if-absent: two concurrent misses may both try
    /// to seed, and a live counter must never be overwritten (that would
    /// lose in-flight clicks).
    ///
    /// Returns `Ok(true)` if the counter was seeded, `Ok(false)` if a live
    /// counter was already present (or on error).
    async fn seed_clicks(&self, short_key: &str, count: u64) -> CacheResult<bool>;

    /// Reads the current click counter, `0` if absent or expired.
    async fn get_clicks(&self, short_key: &str) -> CacheResult<u64>;

    /// Removes the cached URL entry and the click counter for a key.
    ///
    /// Used when a link is deleted.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers.
    async fn invalidate(&self, short_key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
