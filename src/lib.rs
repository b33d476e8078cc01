//! Bookish Book API
//!
//! A REST JSON API for managing a collection of books. Every book endpoint
//! sits behind a bearer token gate; tokens are issued elsewhere and only
//! verified here.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state and its services on top of `repository`
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository, config.auth.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
