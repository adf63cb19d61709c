//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_short_key;

/// PostgreSQL repository for link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. The
/// `short_key` unique constraint backs the key-collision retry loop in the
/// link service.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (short_key, target_url, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, short_key, target_url, owner_id, click_count, created_at
            "#,
        )
        .bind(&new_link.short_key)
        .bind(&new_link.target_url)
        .bind(new_link.owner_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_short_key(&e) {
                AppError::conflict(
                    "Short key already exists",
                    serde_json::json!({ "short_key": new_link.short_key }),
                )
            } else {
                e.into()
            }
        })?;

        Ok(link)
    }

    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_key, target_url, owner_id, click_count, created_at
            FROM links
            WHERE short_key = $1
            "#,
        )
        .bind(short_key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_target_url(
        &self,
        target_url: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_key, target_url, owner_id, click_count, created_at
            FROM links
            WHERE target_url = $1 AND owner_id = $2
            "#,
        )
        .bind(target_url)
        .bind(owner_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_key, target_url, owner_id, click_count, created_at
            FROM links
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn update_click_count(&self, short_key: &str, count: i64) -> Result<(), AppError> {
        // GREATEST keeps the durable count monotone: a stale checkpoint or a
        // post-expiry reseed can never move it backwards.
        sqlx::query(
            r#"
            UPDATE links
            SET click_count = GREATEST(click_count, $2)
            WHERE short_key = $1
            "#,
        )
        .bind(short_key)
        .bind(count)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn delete(&self, short_key: &str, owner_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM links
            WHERE short_key = $1 AND owner_id = $2
            "#,
        )
        .bind(short_key)
        .bind(owner_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
