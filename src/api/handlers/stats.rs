//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the reconciled click count for a short link.
///
/// # Endpoint
///
/// `GET /stats/{short_key}`
///
/// The reported count is the maximum of the durable count and the live
/// cache counter, so it never under-reports between checkpoints and never
/// drops to zero when the counter has merely expired.
///
/// # Errors
///
/// Returns 404 Not Found if the short key doesn't exist.
pub async fn stats_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.stats_service.get_stats(&short_key).await?;

    Ok(Json(stats.into()))
}
