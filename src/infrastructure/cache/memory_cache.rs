//! In-process cache implementation.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::time::{Duration, Instant};
use tracing::debug;

struct UrlEntry {
    target_url: String,
    expires_at: Instant,
}

struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

/// In-process cache backed by sharded concurrent maps.
///
/// Used when Redis is not configured, and as the cache under test. Expiry is
/// lazy: entries past their deadline are treated as absent and dropped on
/// the next touch. Counter operations go through the map's entry API, which
/// holds the shard lock for the duration of the update, giving the same
/// atomic increment and set-if-absent semantics as the Redis commands.
pub struct MemoryCache {
    urls: DashMap<String, UrlEntry>,
    counters: DashMap<String, CounterEntry>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates an in-process cache with the given default TTL.
    pub fn new(default_ttl_seconds: u64) -> Self {
        debug!(
            "Using MemoryCache (in-process, TTL: {}s)",
            default_ttl_seconds
        );
        Self {
            urls: DashMap::new(),
            counters: DashMap::new(),
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, short_key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();

        let live = match self.urls.get(short_key) {
            Some(entry) if entry.expires_at > now => Some(entry.target_url.clone()),
            Some(_) => None,
            None => return Ok(None),
        };

        if live.is_none() {
            self.urls.remove(short_key);
        }

        Ok(live)
    }

    async fn set_url(
        &self,
        short_key: &str,
        target_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let ttl = ttl_seconds.map_or(self.default_ttl, Duration::from_secs);

        self.urls.insert(
            short_key.to_string(),
            UrlEntry {
                target_url: target_url.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );

        Ok(())
    }

    async fn increment_clicks(&self, short_key: &str) -> CacheResult<u64> {
        let now = Instant::now();

        let mut entry = self
            .counters
            .entry(short_key.to_string())
            .or_insert(CounterEntry {
                count: 0,
                expires_at: now + self.default_ttl,
            });

        // An expired counter restarts from zero, as if it had been evicted.
        if entry.expires_at <= now {
            entry.count = 0;
        }

        entry.count += 1;
        entry.expires_at = now + self.default_ttl;

        Ok(entry.count)
    }

    async fn seed_clicks(&self, short_key: &str, count: u64) -> CacheResult<bool> {
        let now = Instant::now();
        let fresh = CounterEntry {
            count,
            expires_at: now + self.default_ttl,
        };

        match self.counters.entry(short_key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().expires_at <= now {
                    occupied.insert(fresh);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                Ok(true)
            }
        }
    }

    async fn get_clicks(&self, short_key: &str) -> CacheResult<u64> {
        let now = Instant::now();

        let live = match self.counters.get(short_key) {
            Some(entry) if entry.expires_at > now => Some(entry.count),
            Some(_) => None,
            None => return Ok(0),
        };

        match live {
            Some(count) => Ok(count),
            None => {
                self.counters.remove(short_key);
                Ok(0)
            }
        }
    }

    async fn invalidate(&self, short_key: &str) -> CacheResult<()> {
        self.urls.remove(short_key);
        self.counters.remove(short_key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
