//! API route configuration.
//!
//! Endpoints under `/api` require Bearer token authentication via
//! [`crate::api::middleware::auth`]; the `/auth` endpoints are public but
//! sit behind the strict rate limiter.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, signup_handler, token_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, post},
};

/// Link management routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /links`             - Create a short link
/// - `GET    /links`             - List the owner's links
/// - `DELETE /links/{short_key}` - Delete a link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route("/links/{short_key}", delete(delete_link_handler))
}

/// Public credential routes.
///
/// # Endpoints
///
/// - `POST /signup` - Register a new owner
/// - `POST /token`  - Exchange credentials for a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/token", post(token_handler))
}
