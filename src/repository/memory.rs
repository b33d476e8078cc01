//! In-memory implementation of the book and user stores
//!
//! Used for local development and tests. Uses RwLock for thread-safe access;
//! ids are assigned from a counter and never reused.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{BookStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, User},
};

#[derive(Default)]
struct MemoryState {
    books: BTreeMap<i64, Book>,
    last_book_id: i64,
    users: BTreeMap<i64, User>,
    last_user_id: i64,
}

/// In-memory store for books and users
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|e| AppError::Internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|e| AppError::Internal(format!("Failed to acquire write lock: {}", e)))
    }

    /// Register a user account that tokens may refer to
    pub fn insert_user(&self, name: &str, email: &str) -> AppResult<User> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == email) {
            return Err(AppError::Internal(format!("User email {} already taken", email)));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            name: name.to_string(),
            email: email.to_string(),
            email_verified_at: Some(now),
            created_at: Some(now),
            updated_at: Some(now),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Number of stored books
    pub fn book_count(&self) -> AppResult<usize> {
        Ok(self.read()?.books.len())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.read()?.books.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let mut state = self.write()?;
        state.last_book_id += 1;

        let now = Utc::now();
        let book = Book {
            id: state.last_book_id,
            title: data.title.clone(),
            author: data.author.clone(),
            publication_year: data.publication_year,
            created_at: now,
            updated_at: now,
        };
        state.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, data: &BookInput) -> AppResult<Option<Book>> {
        let mut state = self.write()?;
        let Some(book) = state.books.get_mut(&id) else {
            return Ok(None);
        };

        book.title = data.title.clone();
        book.author = data.author.clone();
        book.publication_year = data.publication_year;
        book.updated_at = Utc::now();
        Ok(Some(book.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.write()?.books.remove(&id).is_some())
    }

    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }
}
