//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its target URL.
///
/// # Endpoint
///
/// `GET /{short_key}`
///
/// # Request Flow
///
/// 1. Check the cache for the URL entry
/// 2. On cache hit, count the click and redirect; the store is not touched
/// 3. On cache miss, fall through to the store, repopulate the cache, seed
///    the counter from the durable count, count the click
/// 4. Return 307 Temporary Redirect
///
/// Click accounting is handled entirely by the link service; counter
/// failures and checkpoint failures never fail the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the short key doesn't exist.
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = state
        .link_service
        .resolve_and_record_click(&short_key)
        .await?;

    Ok(Redirect::temporary(&target_url))
}
