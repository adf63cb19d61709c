//! DTOs for link statistics.

use serde::Serialize;

use crate::application::services::LinkStats;

/// Reconciled click statistics for a short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_key: String,
    pub clicks: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            short_key: stats.short_key,
            clicks: stats.clicks,
        }
    }
}
