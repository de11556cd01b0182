use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{CredentialStore, StoreError};
use crate::models::User;

/// [`CredentialStore`] backed by the `users` table
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create(
        &self,
        username: &str,
        fullname: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        // The UNIQUE constraint on `username` arbitrates concurrent inserts.
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, fullname, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, fullname, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(fullname)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, fullname, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, fullname, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateUsername
        }
        _ => StoreError::Unavailable(err),
    }
}
