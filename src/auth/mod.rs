use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Signed token claims. Deliberately minimal: the user document key plus the
/// standard issue/expiry timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    Generation(String),

    /// Covers bad signature, malformed token and expiry alike; callers must
    /// not be able to tell these apart from a missing token.
    #[error("invalid token")]
    Invalid,
}

/// Cost factor for bcrypt password hashes.
const BCRYPT_COST: u32 = 12;

pub fn issue_token(config: &AuthConfig, user_id: &str) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        user_id: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::days(config.token_ttl_days)).timestamp(),
    };
    let key = EncodingKey::from_secret(config.token_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
}

pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(config.token_secret.as_bytes());
    decode::<Claims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| TokenError::Invalid)
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Verify a password against a stored hash. A malformed stored hash counts
/// as a mismatch rather than an error the caller could distinguish.
pub fn verify_password(hash: &str, password: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, ttl_days: i64) -> AuthConfig {
        AuthConfig {
            token_secret: secret.to_string(),
            token_ttl_days: ttl_days,
        }
    }

    #[test]
    fn token_round_trips_user_id() {
        let cfg = config("test-secret", 7);
        let token = issue_token(&cfg, "user::a@b.se").unwrap();
        let claims = verify_token(&cfg, &token).unwrap();
        assert_eq!(claims.user_id, "user::a@b.se");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&config("secret-a", 7), "user::a@b.se").unwrap();
        assert!(verify_token(&config("secret-b", 7), &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config("test-secret", -1);
        let token = issue_token(&cfg, "user::a@b.se").unwrap();
        assert!(verify_token(&cfg, &token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token(&config("test-secret", 7), "not-a-token").is_err());
    }
}
