//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// The persistent store is the system of record: the `short_key` unique
/// constraint is the final arbiter for key collisions, and `click_count` is
/// only ever moved forward through [`LinkRepository::update_click_count`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short key already exists.
    /// Callers treat that conflict as a signal to retry key generation,
    /// never as a caller-facing error.
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the store cannot be reached.
    /// Returns [`AppError::Internal`] on other database errors.
    async fn find_by_short_key(&self, short_key: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its normalized target URL and owner.
    ///
    /// Used for the per-owner deduplication check on creation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_target_url(
        &self,
        target_url: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Lists all links belonging to an owner, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Writes a durable click-count checkpoint.
    ///
    /// The stored value only moves forward: a checkpoint below the current
    /// durable count leaves the row unchanged, so concurrent checkpoints
    /// and post-expiry reseeds can never regress the authoritative total.
    ///
    /// A checkpoint for a key that no longer exists is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_click_count(&self, short_key: &str, count: i64) -> Result<(), AppError>;

    /// Deletes a link owned by `owner_id`.
    ///
    /// Returns `Ok(true)` if the link was found and deleted, `Ok(false)` if
    /// no link matches the key and owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, short_key: &str, owner_id: i64) -> Result<bool, AppError>;

    /// Checks that the store is reachable.
    ///
    /// Used by the health endpoint to report store status.
    async fn health_check(&self) -> bool;
}
