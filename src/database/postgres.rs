use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{FromRow, PgPool};

use super::{RepositoryError, RepositoryResult, UserRepository, USERS_LIMIT};
use crate::models::User;

/// Row shape of the `users` table; timestamps are stored as UTC `timestamp`.
#[derive(FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: Utc.from_utc_datetime(&row.created_at),
            updated_at: Utc.from_utc_datetime(&row.updated_at),
        }
    }
}

#[derive(Clone)]
pub struct PostgreDatabase {
    sqlx_db: PgPool,
}

impl PostgreDatabase {
    pub fn new(sqlx_db: PgPool) -> Self {
        PostgreDatabase { sqlx_db }
    }
}

#[async_trait]
impl UserRepository for PostgreDatabase {
    /// Get a user by ID
    async fn get_user(&self, id: i32) -> RepositoryResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.sqlx_db)
        .await?;

        row.map(User::from).ok_or(RepositoryError::NotFound { id })
    }

    async fn get_users(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(USERS_LIMIT as i64)
        .fetch_all(&self.sqlx_db)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Create a new user, stamping both timestamps with the current time
    async fn create_user(&self, user: &User) -> RepositoryResult<i32> {
        let now = Utc::now().naive_utc();
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(now)
        .bind(now)
        .fetch_one(&self.sqlx_db)
        .await?;

        Ok(id)
    }

    async fn close(&self) -> RepositoryResult<()> {
        self.sqlx_db.close().await;
        Ok(())
    }
}
