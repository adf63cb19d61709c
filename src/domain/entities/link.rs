//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL link with metadata.
///
/// Represents the mapping between a short key and a target URL, owned by a
/// single owner. `click_count` is the authoritative click total as of the
/// last durable checkpoint; the live total may be ahead of it in the
/// volatile cache.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub short_key: String,
    pub target_url: String,
    pub owner_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_key: String,
        target_url: String,
        owner_id: i64,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_key,
            target_url,
            owner_id,
            click_count,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// `click_count` starts at zero and `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_key: String,
    pub target_url: String,
    pub owner_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            7,
            0,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.short_key, "abc12345");
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.owner_id, 7);
        assert_eq!(link.click_count, 0);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_new_link_creation() {
        let new_link = NewLink {
            short_key: "xyz78901".to_string(),
            target_url: "https://rust-lang.org".to_string(),
            owner_id: 42,
        };

        assert_eq!(new_link.short_key, "xyz78901");
        assert_eq!(new_link.target_url, "https://rust-lang.org");
        assert_eq!(new_link.owner_id, 42);
    }
}
