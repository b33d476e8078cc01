//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRequest},
    AppState,
};

use super::{auth::AuthenticatedUser, ApiJson, MessageResponse};

/// List of books
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub data: Vec<Book>,
}

/// Single book
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub data: Book,
}

/// Book written by a create or update, with a confirmation message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookSavedResponse {
    pub data: Book,
    pub message: String,
}

/// Book ids are integers; anything else cannot name a row.
fn parse_id(raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|_| AppError::book_not_found(raw))
}

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Successful operation", body = BookListResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 500, description = "Server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<BookListResponse>> {
    let data = state
        .services
        .books
        .list()
        .await
        .map_err(|e| e.during("Failed to fetch books"))?;
    tracing::debug!(user_id = user.id, count = data.len(), "List books request served");

    Ok(Json(BookListResponse { data }))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created successfully", body = BookSavedResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 422, description = "Validation error", body = crate::error::ValidationErrorResponse),
        (status = 500, description = "Server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(request): ApiJson<BookRequest>,
) -> AppResult<(StatusCode, Json<BookSavedResponse>)> {
    let book = state
        .services
        .books
        .create(request)
        .await
        .map_err(|e| e.during("Failed to create book"))?;
    tracing::debug!(user_id = user.id, book_id = book.id, "Create book request served");

    Ok((
        StatusCode::CREATED,
        Json(BookSavedResponse {
            data: book,
            message: "Book created successfully".to_string(),
        }),
    ))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "ID of book to return")),
    responses(
        (status = 200, description = "Successful operation", body = BookResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let id = parse_id(&id)?;
    let data = state
        .services
        .books
        .get(id)
        .await
        .map_err(|e| e.during("Failed to fetch book"))?;
    tracing::debug!(user_id = user.id, book_id = id, "Get book request served");

    Ok(Json(BookResponse { data }))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "ID of book to update")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated successfully", body = BookSavedResponse),
        (status = 400, description = "Malformed request body", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation error", body = crate::error::ValidationErrorResponse),
        (status = 500, description = "Server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<BookRequest>,
) -> AppResult<Json<BookSavedResponse>> {
    // Validation runs first: a bad payload is a 422 even for an unknown id
    let book = match parse_id(&id) {
        Ok(id) => state.services.books.update(id, request).await,
        Err(not_found) => request.validated().and(Err(not_found)),
    }
    .map_err(|e| e.during("Failed to update book"))?;
    tracing::debug!(user_id = user.id, book_id = book.id, "Update book request served");

    Ok(Json(BookSavedResponse {
        data: book,
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "ID of book to delete")),
    responses(
        (status = 200, description = "Book deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Server error", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    state
        .services
        .books
        .delete(id)
        .await
        .map_err(|e| e.during("Failed to delete book"))?;
    tracing::debug!(user_id = user.id, book_id = id, "Delete book request served");

    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
