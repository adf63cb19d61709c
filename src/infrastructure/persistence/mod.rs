//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements against the Postgres system of record.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and click checkpoints
//! - [`PgOwnerRepository`] - Owner account storage

pub mod pg_link_repository;
pub mod pg_owner_repository;

pub use pg_link_repository::PgLinkRepository;
pub use pg_owner_repository::PgOwnerRepository;
