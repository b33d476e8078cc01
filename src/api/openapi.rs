//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookish API",
        version = "1.0.0",
        description = "Book collection REST API with bearer token authentication",
        license(name = "Apache 2.0", url = "http://www.apache.org/licenses/LICENSE-2.0.html"),
        contact(name = "Bookish Team", email = "admin@bookish.com")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookRequest,
            books::BookListResponse,
            books::BookResponse,
            books::BookSavedResponse,
            crate::api::MessageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ValidationErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "API Endpoints for Book Management")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the book endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
