//! Link resolution service: creation, redirect resolution, click accounting.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::key_generator::generate_key;
use crate::utils::url_validator::validate_target_url;
use serde_json::json;
use tracing::{error, warn};

/// Bounded retries for key generation.
///
/// Collisions are astronomically unlikely at 48 bits of entropy; the bound
/// is a circuit breaker for a misconfigured or saturated key space, not an
/// expected path.
const MAX_KEY_ATTEMPTS: usize = 5;

/// Tunables for link resolution and click accounting.
#[derive(Debug, Clone)]
pub struct ResolutionPolicy {
    /// Durable checkpoint every N clicks. Bounds click loss on counter
    /// expiry to N - 1.
    pub flush_interval: u64,
    /// Maximum accepted target URL length in characters.
    pub max_url_length: usize,
    /// Hosts that must not be shortened (exact, case-insensitive match).
    pub blocked_hosts: Vec<String>,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            flush_interval: 10,
            max_url_length: 2048,
            blocked_hosts: Vec::new(),
        }
    }
}

/// Service for creating, resolving and deleting shortened links.
///
/// Owns the read-through cache policy for the redirect path and the
/// reconciliation policy between the volatile click counter and the durable
/// count in the persistent store.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    policy: ResolutionPolicy,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        policy: ResolutionPolicy,
    ) -> Self {
        Self {
            links,
            cache,
            policy,
        }
    }

    /// Creates a short link for an owner.
    ///
    /// # Deduplication
    ///
    /// If the owner already has a link for the same normalized URL, the
    /// existing link is returned instead of creating a duplicate.
    ///
    /// # Cache pre-warm
    ///
    /// The new link's URL entry and counter are written to the cache
    /// immediately, so the first redirect is a cache hit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed, over-long,
    /// non-HTTP(S), or denylisted.
    /// Returns [`AppError::KeyGenerationExhausted`] if no unique key could
    /// be found within the retry bound.
    pub async fn create_link(&self, target_url: &str, owner_id: i64) -> Result<Link, AppError> {
        let normalized = validate_target_url(
            target_url,
            self.policy.max_url_length,
            &self.policy.blocked_hosts,
        )
        .map_err(|e| AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() })))?;

        if let Some(existing) = self
            .links
            .find_by_target_url(&normalized, owner_id)
            .await?
        {
            return Ok(existing);
        }

        let link = self.insert_with_fresh_key(&normalized, owner_id).await?;

        if let Err(e) = self
            .cache
            .set_url(&link.short_key, &link.target_url, None)
            .await
        {
            warn!("Failed to pre-warm cache for {}: {}", link.short_key, e);
        }
        if let Err(e) = self
            .cache
            .seed_clicks(&link.short_key, link.click_count as u64)
            .await
        {
            warn!("Failed to seed counter for {}: {}", link.short_key, e);
        }

        Ok(link)
    }

    /// Resolves a short key to its target URL and records the click.
    ///
    /// # Request flow
    ///
    /// 1. Cache hit on the URL entry: increment the counter and return; the
    ///    persistent store is not touched.
    /// 2. Cache miss (or cache error, which is treated as a miss): read the
    ///    store, rewrite the URL entry, seed the counter from the durable
    ///    count if no live counter exists, then increment and return.
    ///
    /// Every [`ResolutionPolicy::flush_interval`]-th click checkpoints the
    /// live counter back to the store off the request path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key exists in neither cache nor
    /// store.
    /// Returns [`AppError::Unavailable`] if the persistent store cannot be
    /// reached on a cache miss.
    pub async fn resolve_and_record_click(&self, short_key: &str) -> Result<String, AppError> {
        match self.cache.get_url(short_key).await {
            Ok(Some(target_url)) => {
                self.record_click(short_key).await;
                return Ok(target_url);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Cache read failed for {}: {}", short_key, e);
            }
        }

        let link = self
            .links
            .find_by_short_key(short_key)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_key": short_key }))
            })?;

        if let Err(e) = self
            .cache
            .set_url(short_key, &link.target_url, None)
            .await
        {
            warn!("Failed to cache URL for {}: {}", short_key, e);
        }

        // Seed-if-absent: a live counter already carries clicks that the
        // durable count does not, so it must never be overwritten.
        if let Err(e) = self
            .cache
            .seed_clicks(short_key, link.click_count as u64)
            .await
        {
            warn!("Failed to seed counter for {}: {}", short_key, e);
        }

        self.record_click(short_key).await;

        Ok(link.target_url)
    }

    /// Lists all links belonging to an owner, newest first.
    pub async fn list_links(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.links.list_by_owner(owner_id).await
    }

    /// Reports whether the persistent store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.links.health_check().await
    }

    /// Deletes a link owned by `owner_id`, together with its cache entry and
    /// counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the key and owner.
    pub async fn delete_link(&self, short_key: &str, owner_id: i64) -> Result<(), AppError> {
        let removed = self.links.delete(short_key, owner_id).await?;

        if !removed {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "short_key": short_key }),
            ));
        }

        if let Err(e) = self.cache.invalidate(short_key).await {
            warn!("Failed to invalidate cache for {}: {}", short_key, e);
        }

        Ok(())
    }

    /// Increments the live counter and checkpoints on every
    /// `flush_interval`-th click.
    ///
    /// Counter failures are logged and swallowed; a redirect never fails
    /// because of click accounting.
    async fn record_click(&self, short_key: &str) {
        let count = match self.cache.increment_clicks(short_key).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count click for {}: {}", short_key, e);
                return;
            }
        };

        // A zero count means the increment failed open; there is nothing
        // worth checkpointing.
        if count == 0 || count % self.policy.flush_interval != 0 {
            return;
        }

        // Durable checkpoint, off the request path. Last writer wins: the
        // value written is the current live counter and the store keeps the
        // maximum, so overlapping checkpoints are safe.
        let links = Arc::clone(&self.links);
        let short_key = short_key.to_string();
        tokio::spawn(async move {
            if let Err(e) = links.update_click_count(&short_key, count as i64).await {
                warn!("Click checkpoint failed for {}: {}", short_key, e);
            }
        });
    }

    /// Generates a unique key and inserts the link, retrying on collision.
    ///
    /// The store's unique constraint is the final arbiter: losing the
    /// check-then-insert race surfaces as a conflict, which is converted
    /// into another attempt rather than an error.
    async fn insert_with_fresh_key(
        &self,
        target_url: &str,
        owner_id: i64,
    ) -> Result<Link, AppError> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let short_key = generate_key();

            if self.links.find_by_short_key(&short_key).await?.is_some() {
                continue;
            }

            match self
                .links
                .insert(NewLink {
                    short_key,
                    target_url: target_url.to_string(),
                    owner_id,
                })
                .await
            {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        error!(
            "Short key space exhausted after {} attempts",
            MAX_KEY_ATTEMPTS
        );
        Err(AppError::key_generation_exhausted(
            "Could not generate a unique short key",
            json!({ "attempts": MAX_KEY_ATTEMPTS }),
        ))
    }
}
