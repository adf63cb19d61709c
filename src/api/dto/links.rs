//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The target URL to shorten (must be absolute HTTP/HTTPS).
    ///
    /// Full validation, normalization and the host denylist check happen in
    /// the link service; this bound just rejects absurd payloads early.
    #[validate(length(min = 1, max = 8192))]
    pub target_url: String,
}

/// A link as returned to its owner.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub short_key: String,
    pub target_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_key: link.short_key,
            target_url: link.target_url,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}
