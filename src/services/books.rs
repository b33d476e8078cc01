//! Book management service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookInput, BookRequest},
    repository::BookStore,
};

/// Books inserted by [`BooksService::seed_defaults`]
pub const SAMPLE_BOOKS: [(&str, &str, i32); 5] = [
    ("The Great Gatsby", "F. Scott Fitzgerald", 1925),
    ("1984", "George Orwell", 1949),
    ("To Kill a Mockingbird", "Harper Lee", 1960),
    ("The Hobbit", "J.R.R. Tolkien", 1937),
    ("Pride and Prejudice", "Jane Austen", 1813),
];

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.store.find_all().await
    }

    /// Find-or-fail lookup
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))
    }

    pub async fn create(&self, request: BookRequest) -> AppResult<Book> {
        let data = request.validated()?;
        let book = self.store.create(&data).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    /// Full-field replace. The payload is validated before the lookup, so an
    /// invalid payload for a missing id reports the validation errors.
    pub async fn update(&self, id: i64, request: BookRequest) -> AppResult<Book> {
        let data = request.validated()?;
        let book = self
            .store
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;
        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::book_not_found(id));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Insert the sample books when the collection is empty.
    /// Returns the number of books inserted.
    pub async fn seed_defaults(&self) -> AppResult<usize> {
        if !self.store.find_all().await?.is_empty() {
            tracing::debug!("Book table not empty, skipping seed");
            return Ok(0);
        }

        for (title, author, publication_year) in SAMPLE_BOOKS {
            let data = BookInput {
                title: title.to_string(),
                author: author.to_string(),
                publication_year,
            };
            self.store.create(&data).await?;
        }
        tracing::info!("Seeded {} sample books", SAMPLE_BOOKS.len());
        Ok(SAMPLE_BOOKS.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBookStore;
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;

    fn book(id: i64, title: &str) -> Book {
        let now = Utc::now();
        Book {
            id,
            title: title.to_string(),
            author: "George Orwell".to_string(),
            publication_year: 1949,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(title: &str) -> BookRequest {
        BookRequest {
            title: Some(json!(title)),
            author: Some(json!("George Orwell")),
            publication_year: Some(json!(1949)),
        }
    }

    #[tokio::test]
    async fn test_get_missing_book() {
        let mut store = MockBookStore::new();
        store
            .expect_find_by_id()
            .with(eq(999))
            .returning(|_| Ok(None));

        let service = BooksService::new(Arc::new(store));
        let err = service.get(999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { ref id, .. } if id == "999"));
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let mut store = MockBookStore::new();
        store
            .expect_update()
            .withf(|id, data| *id == 5 && data.title == "Animal Farm")
            .returning(|_, _| Ok(None));

        let service = BooksService::new(Arc::new(store));
        let err = service.update(5, request("Animal Farm")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_payload_never_reaches_store() {
        let mut store = MockBookStore::new();
        store.expect_create().never();
        store.expect_update().never();

        let service = BooksService::new(Arc::new(store));
        let err = service.create(BookRequest::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service.update(1, request("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_book() {
        let mut store = MockBookStore::new();
        store.expect_delete().with(eq(3)).returning(|_| Ok(false));

        let service = BooksService::new(Arc::new(store));
        let err = service.delete(3).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let mut store = MockBookStore::new();
        store
            .expect_find_all()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let service = BooksService::new(Arc::new(store));
        let err = service.list().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let mut store = MockBookStore::new();
        store
            .expect_find_all()
            .returning(|| Ok(vec![book(1, "Existing")]));
        store.expect_create().never();

        let service = BooksService::new(Arc::new(store));
        assert_eq!(service.seed_defaults().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seed_inserts_samples() {
        let mut store = MockBookStore::new();
        store.expect_find_all().returning(|| Ok(vec![]));
        store
            .expect_create()
            .times(SAMPLE_BOOKS.len())
            .returning(|data| Ok(book(1, &data.title)));

        let service = BooksService::new(Arc::new(store));
        assert_eq!(service.seed_defaults().await.unwrap(), 5);
    }
}
