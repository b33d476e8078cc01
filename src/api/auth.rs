//! Bearer token gate for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{error::AppError, models::User, AppState};

/// User resolved from the request's bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Reject the request unless it carries a bearer token naming an existing user.
///
/// Runs before body extraction, so unauthenticated writes never reach
/// validation or the store.
pub async fn require_bearer(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer
        .as_ref()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().trim())
        .filter(|token| !token.is_empty())
        .ok_or(AppError::MissingToken)?;

    let user = state.services.auth.check(token).await?;
    tracing::debug!(user_id = user.id, "Bearer token accepted");

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}
