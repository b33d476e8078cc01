//! User model and bearer token claims

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account, owned by the token-issuing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// JWT claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID, as a string
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    /// Claims for `user_id`, valid for `ttl` from now
    pub fn for_user(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Sign the claims (HS256)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, then return the claims
    pub fn from_token(
        token: &str,
        secret: &str,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }

    /// User ID named by the token, if `sub` is numeric
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}
