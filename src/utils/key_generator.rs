//! Short key generation.
//!
//! Produces cryptographically secure random keys for shortened URLs.

use base64::Engine as _;

/// Length of random bytes before base64 encoding.
///
/// Six bytes encode to an 8-character URL-safe key, giving 2^48 possible
/// keys; collisions are resolved against the store at creation time.
const KEY_LENGTH_BYTES: usize = 6;

/// Generates a cryptographically secure random short key.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character key.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
///
/// # Examples
///
/// ```ignore
/// let key = generate_key();
/// assert_eq!(key.len(), 8);
/// assert!(key.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_key() -> String {
    let mut buffer = [0u8; KEY_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
