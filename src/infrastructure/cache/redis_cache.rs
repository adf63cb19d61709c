//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache implementation for URL lookups and click counters.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse. All operations are fail-open: errors are logged but don't
/// propagate to callers, so a Redis outage degrades the service to direct
/// store lookups instead of failing redirects.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    url_prefix: String,
    clicks_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied to cached entries and counters;
    ///   controlled via `CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            url_prefix: "url:".to_string(),
            clicks_prefix: "clicks:".to_string(),
        })
    }

    fn url_key(&self, short_key: &str) -> String {
        format!("{}{}", self.url_prefix, short_key)
    }

    fn clicks_key(&self, short_key: &str) -> String {
        format!("{}{}", self.clicks_prefix, short_key)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        let key = self.url_key(short_key);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {} -> {}", short_key, url);
                Ok(Some(url))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", short_key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", short_key, e);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_key: &str,
        target_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.url_key(short_key);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match conn.set_ex::<_, _, ()>(&key, target_url, ttl).await {
            Ok(_) => {
                debug!("Cache SET: {} -> {} (TTL: {}s)", short_key, target_url, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", short_key, e);
                Ok(())
            }
        }
    }

    async fn increment_clicks(&self, short_key: &str) -> CacheResult<u64> {
        let key = self.clicks_key(short_key);
        let mut conn = self.client.clone();

        // Server-side INCR keeps the counter race-free under concurrent
        // redirects; the TTL refresh is a separate, best-effort command.
        let count = match conn.incr::<_, _, u64>(&key, 1u64).await {
            Ok(count) => count,
            Err(e) => {
                error!("Redis INCR error for {}: {}", short_key, e);
                return Ok(0);
            }
        };

        if let Err(e) = conn.expire::<_, i64>(&key, self.default_ttl as i64).await {
            warn!("Redis EXPIRE error for {}: {}", short_key, e);
        }

        debug!("Click #{} for {}", count, short_key);
        Ok(count)
    }

    async fn seed_clicks(&self, short_key: &str, count: u64) -> CacheResult<bool> {
        let key = self.clicks_key(short_key);
        let mut conn = self.client.clone();

        // SET NX EX: only seeds when no live counter exists, in one round
        // trip. A plain check-then-set would let two concurrent misses both
        // reseed and double-count.
        let result = redis::cmd("SET")
            .arg(&key)
            .arg(count)
            .arg("NX")
            .arg("EX")
            .arg(self.default_ttl)
            .query_async::<Option<String>>(&mut conn)
            .await;

        match result {
            Ok(Some(_)) => {
                debug!("Seeded counter for {} at {}", short_key, count);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                warn!("Redis SET NX error for {}: {}", short_key, e);
                Ok(false)
            }
        }
    }

    async fn get_clicks(&self, short_key: &str) -> CacheResult<u64> {
        let key = self.clicks_key(short_key);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<u64>>(&key).await {
            Ok(count) => Ok(count.unwrap_or(0)),
            Err(e) => {
                error!("Redis GET error for {}: {}", short_key, e);
                Ok(0)
            }
        }
    }

    async fn invalidate(&self, short_key: &str) -> CacheResult<()> {
        let mut conn = self.client.clone();

        match conn
            .del::<_, i32>(vec![self.url_key(short_key), self.clicks_key(short_key)])
            .await
        {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", short_key);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", short_key, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
