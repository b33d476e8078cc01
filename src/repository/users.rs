//! Users repository for PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::UserStore;
use crate::{error::AppResult, models::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, email_verified_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
