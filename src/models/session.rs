//! Librarian session claims

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims carried by the session cookie or bearer token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(username: &str, valid_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            exp: (now + Duration::hours(valid_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let claims = SessionClaims::new("librarian", 1);
        let token = claims.create_token("secret").unwrap();
        assert_eq!(SessionClaims::from_token(&token, "secret").unwrap(), claims);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = SessionClaims::new("librarian", 1).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = SessionClaims::new("librarian", -2).create_token("secret").unwrap();
        assert!(SessionClaims::from_token(&token, "secret").is_err());
    }
}
