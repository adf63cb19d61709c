//! Click statistics service.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use serde_json::json;

/// Reconciled click statistics for a single link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub short_key: String,
    pub clicks: u64,
}

/// Service for reporting reconciled click counts.
///
/// The merge rule is the correctness-relevant part: between checkpoints the
/// live counter runs ahead of the durable count, while after a counter
/// expiry the durable count is the only survivor. Reporting the maximum of
/// the two never under-reports and requires no write.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(links: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self { links, cache }
    }

    /// Returns the reconciled click count for a short key.
    ///
    /// Reads the durable count from the persistent store and the live
    /// counter from the cache (0 when absent or expired) and reports the
    /// maximum of the two.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the key.
    pub async fn get_stats(&self, short_key: &str) -> Result<LinkStats, AppError> {
        let link = self
            .links
            .find_by_short_key(short_key)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "short_key": short_key }))
            })?;

        let live = self.cache.get_clicks(short_key).await.unwrap_or(0);

        Ok(LinkStats {
            short_key: link.short_key,
            clicks: (link.click_count as u64).max(live),
        })
    }
}
