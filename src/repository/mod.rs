//! Repository layer for book and user storage

pub mod books;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookInput, User},
};

/// Persistent book storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by id
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    async fn create(&self, data: &BookInput) -> AppResult<Book>;

    /// Replace every field of a book and refresh `updated_at`.
    /// Returns `None` when no book has this id.
    async fn update(&self, id: i64, data: &BookInput) -> AppResult<Option<Book>>;

    /// Returns `false` when no book has this id
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Check that the backing store answers
    async fn ping(&self) -> AppResult<()>;
}

/// Read access to the user accounts tokens refer to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
}

/// Main repository struct holding the storage backends
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Create a repository backed by an in-process store
    pub fn memory(store: Arc<memory::MemoryStore>) -> Self {
        Self {
            books: store.clone(),
            users: store,
        }
    }
}
