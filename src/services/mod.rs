//! Business logic services

pub mod auth;
pub mod books;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.users, auth_config),
            books: books::BooksService::new(repository.books),
        }
    }
}
