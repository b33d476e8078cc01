//! Error types for Bookish server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::api::MessageResponse;

/// Message returned to clients in place of internal failure details
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token not provided")]
    MissingToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("No query results for {} {}", .resource.to_lowercase(), .id)]
    NotFound { resource: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A server-side failure annotated with the controller action that hit it
    #[error("{action}: {source}")]
    Operation {
        action: &'static str,
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn book_not_found(id: impl ToString) -> Self {
        AppError::NotFound {
            resource: "Book",
            id: id.to_string(),
        }
    }

    /// Attach a controller action to server-side failures.
    ///
    /// Client errors (401, 404, 422, ...) are returned unchanged.
    pub fn during(self, action: &'static str) -> Self {
        match self {
            e @ (AppError::Database(_) | AppError::Internal(_)) => AppError::Operation {
                action,
                source: Box::new(e),
            },
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) | AppError::Operation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Short error label
    pub error: String,
    /// Human readable detail
    pub message: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// Validation failure body, one list of messages per rejected field
#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl From<&ValidationErrors> for ValidationErrorResponse {
    fn from(errors: &ValidationErrors) -> Self {
        let errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let messages = field_errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("The {} field is invalid.", field.replace('_', " ")),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            message: "The given data was invalid.".to_string(),
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        match self {
            AppError::MissingToken => {
                tracing::debug!("Request rejected: no bearer token");
                (status, Json(MessageResponse::new("Token not provided"))).into_response()
            }
            AppError::Unauthorized(reason) => {
                tracing::warn!("Request rejected: {}", reason);
                (status, Json(MessageResponse::new("Unauthorized"))).into_response()
            }
            AppError::NotFound { resource, .. } => {
                let body = ErrorResponse::new(format!("{} not found", resource), detail);
                (status, Json(body)).into_response()
            }
            AppError::Validation(errors) => {
                (status, Json(ValidationErrorResponse::from(&errors))).into_response()
            }
            AppError::BadRequest(msg) => {
                (status, Json(ErrorResponse::new("Invalid request body", msg))).into_response()
            }
            AppError::Unavailable(msg) => {
                (status, Json(ErrorResponse::new("Service unavailable", msg))).into_response()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (status, Json(ErrorResponse::new("Database error", INTERNAL_ERROR_MESSAGE)))
                    .into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (status, Json(ErrorResponse::new("Internal error", INTERNAL_ERROR_MESSAGE)))
                    .into_response()
            }
            AppError::Operation { action, source } => {
                tracing::error!(error = %source, "{}", action);
                (status, Json(ErrorResponse::new(action, INTERNAL_ERROR_MESSAGE))).into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
