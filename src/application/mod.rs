//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! cache calls, validation, and business rules. Services consume the domain
//! traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, redirect
//!   resolution and click accounting
//! - [`services::stats_service::StatsService`] - Reconciled click statistics
//! - [`services::auth_service::AuthService`] - Owner registration and token
//!   authentication

pub mod services;
