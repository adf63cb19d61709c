//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_key}`       - Short link redirect (public)
//! - `GET  /stats/{short_key}` - Reconciled click statistics (public)
//! - `GET  /health`            - Health check: DB, cache (public)
//! - `/auth/*`                 - Signup and token issuance (public, strict rate limit)
//! - `/api/*`                  - Link management (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on credential and stats routes
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, stats_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The redirect route carries no rate limiter; only the tracing layer sits
/// on the hot path.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let auth_router = api::routes::auth_routes().layer(rate_limit::secure_layer());

    let stats_router = Router::new()
        .route("/stats/{short_key}", get(stats_handler))
        .layer(rate_limit::layer());

    let router = Router::new()
        .route("/{short_key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(stats_router)
        .nest("/auth", auth_router)
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
