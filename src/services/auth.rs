//! Bearer token verification

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{TokenClaims, User},
    repository::UserStore,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Resolve the user a bearer token identifies.
    ///
    /// Fails with `Unauthorized` when the signature or expiry does not
    /// verify, or when the subject is not an existing user.
    pub async fn check(&self, token: &str) -> AppResult<User> {
        let claims =
            TokenClaims::from_token(token, &self.config.jwt_secret, self.config.leeway_seconds)
                .map_err(|e| AppError::Unauthorized(format!("invalid token: {}", e)))?;

        let user_id = claims.user_id().ok_or_else(|| {
            AppError::Unauthorized(format!("token subject {:?} is not a user id", claims.sub))
        })?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(format!("user {} does not exist", user_id)))
    }
}
