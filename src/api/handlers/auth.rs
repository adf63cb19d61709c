//! Handlers for owner registration and token issuance.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{OwnerResponse, SignupRequest, TokenRequest, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new owner account.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Errors
///
/// Returns 400 Bad Request for an invalid email or a too-short password.
/// Returns 409 Conflict if the email is already registered.
pub async fn signup_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<OwnerResponse>), AppError> {
    payload.validate()?;

    let owner = state
        .auth_service
        .register_owner(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(owner.into())))
}

/// Exchanges owner credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/token`
///
/// # Errors
///
/// Returns 401 Unauthorized for unknown email or wrong password; the two
/// cases are indistinguishable to the caller.
pub async fn token_handler(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let owner_id = state
        .auth_service
        .verify_credentials(&payload.email, &payload.password)
        .await?;

    let token = state.auth_service.issue_token(owner_id)?;

    Ok(Json(TokenResponse::bearer(token)))
}
