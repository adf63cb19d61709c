//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete adapters for the persistent store (PostgreSQL via SQLx) and the
//! volatile cache (Redis, or an in-process fallback).

pub mod cache;
pub mod persistence;
