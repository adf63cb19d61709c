//! PostgreSQL implementation of owner repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewOwner, Owner};
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_email;

/// PostgreSQL repository for owner accounts.
pub struct PgOwnerRepository {
    pool: Arc<PgPool>,
}

impl PgOwnerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PgOwnerRepository {
    async fn create(&self, new_owner: NewOwner) -> Result<Owner, AppError> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(&new_owner.email)
        .bind(&new_owner.password_hash)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_email(&e) {
                AppError::conflict(
                    "Email already registered",
                    serde_json::json!({ "email": new_owner.email }),
                )
            } else {
                e.into()
            }
        })?;

        Ok(owner)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM owners
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(owner)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM owners
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(owner)
    }
}
