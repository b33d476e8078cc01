//! API handlers for Bookish REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    middleware,
    routing::get,
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, AppState};

/// JSON body extractor whose rejections render as [`AppError`].
///
/// The body is decoded whatever its `Content-Type`, and an empty body reads
/// as `{}`, so missing fields reach validation. Only a body that is not valid
/// JSON for `T` is rejected here.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(body).map(ApiJson).map_err(|e| {
            AppError::BadRequest(format!("Failed to parse the request body as JSON: {}", e))
        })
    }
}

/// Response carrying only a message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Book resource, behind the bearer token gate
    let books = Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", books)
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
