//! Handlers for link management endpoints (create, list, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::api::middleware::auth::CurrentOwner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the authenticated owner.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Idempotence
///
/// Creating a link for a URL the owner has already shortened returns the
/// existing link rather than a duplicate; the response is 201 either way.
///
/// # Errors
///
/// Returns 400 Bad Request if the URL fails validation.
/// Returns 401 Unauthorized without a valid bearer token.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(&payload.target_url, owner_id)
        .await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists the authenticated owner's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links(owner_id).await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Deletes one of the authenticated owner's links.
///
/// Removes the persistent row together with the cached URL entry and click
/// counter.
///
/// # Endpoint
///
/// `DELETE /api/links/{short_key}`
///
/// # Errors
///
/// Returns 404 Not Found if the key doesn't exist or belongs to another
/// owner; the two cases are indistinguishable to the caller.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(CurrentOwner(owner_id)): Extension<CurrentOwner>,
    Path(short_key): Path<String>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&short_key, owner_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
