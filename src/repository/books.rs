//! Books repository for PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookStore;
use crate::{
    error::AppResult,
    models::{Book, BookInput},
};

const BOOK_COLUMNS: &str = "id, title, author, publication_year, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, publication_year, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.publication_year)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, data: &BookInput) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, publication_year = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(&data.author)
        .bind(data.publication_year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
