//! Owner entity representing a registered link owner.

use chrono::{DateTime, Utc};

/// A registered account that owns shortened links.
///
/// `password_hash` is an Argon2id PHC string; the plaintext credential never
/// leaves the authentication service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Owner {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a new owner.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_owner_fields() {
        let owner = Owner {
            id: 3,
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            created_at: Utc::now(),
        };

        assert_eq!(owner.id, 3);
        assert_eq!(owner.email, "user@example.com");
        assert!(owner.password_hash.starts_with("$argon2id$"));
    }
}
