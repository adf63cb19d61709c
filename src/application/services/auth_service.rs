//! Authentication service: owner registration, credential verification and
//! signed-token issuance.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::entities::{NewOwner, Owner};
use crate::domain::repositories::OwnerRepository;
use crate::error::AppError;
use serde_json::json;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Service for authenticating link owners.
///
/// Passwords are hashed with Argon2id before storage; tokens are HS256 JWTs
/// signed with the server secret. Token resolution is pure verification: it
/// yields the owner id without touching the store, so the request path pays
/// no database cost for authentication.
pub struct AuthService {
    owners: Arc<dyn OwnerRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_minutes: u64,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `owners` - owner repository for registration and credential checks
    /// - `signing_secret` - HMAC key for token signing; must be stable
    ///   across restarts or issued tokens are invalidated
    /// - `token_expiry_minutes` - access token lifetime
    pub fn new(
        owners: Arc<dyn OwnerRepository>,
        signing_secret: &str,
        token_expiry_minutes: u64,
    ) -> Self {
        Self {
            owners,
            encoding_key: EncodingKey::from_secret(signing_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(signing_secret.as_bytes()),
            token_expiry_minutes,
        }
    }

    /// Registers a new owner with a hashed credential.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] if password hashing fails.
    pub async fn register_owner(&self, email: &str, password: &str) -> Result<Owner, AppError> {
        let password_hash = hash_password(password)?;

        self.owners
            .create(NewOwner {
                email: email.to_string(),
                password_hash,
            })
            .await
    }

    /// Verifies an owner's credentials and returns their id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email or a wrong
    /// password; the two cases are indistinguishable to the caller.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<i64, AppError> {
        let invalid =
            || AppError::unauthorized("Invalid email or password", json!({}));

        let owner = self
            .owners
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &owner.password_hash)? {
            return Err(invalid());
        }

        Ok(owner.id)
    }

    /// Issues a signed access token for an owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue_token(&self, owner_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: owner_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.token_expiry_minutes as i64)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("Failed to issue token", json!({ "reason": e.to_string() })))
    }

    /// Resolves a token to the owner id it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for expired, malformed or
    /// wrongly-signed tokens.
    pub fn resolve_token(&self, token: &str) -> Result<i64, AppError> {
        let invalid = || {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid or expired token" }))
        };

        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| invalid())?;

        token_data.claims.sub.parse::<i64>().map_err(|_| invalid())
    }
}

/// Hashes a password with Argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
}

/// Verifies a password against a stored Argon2 PHC string.
fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal("Stored hash is malformed", json!({ "reason": e.to_string() })))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
