mod mock;
mod postgres;

pub use mock::MockRepository;
pub use postgres::PostgreDatabase;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{migrate::MigrateError, postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{config::DbConfig, models::User};

/// Maximum number of users returned by [UserRepository::get_users]
pub const USERS_LIMIT: usize = 100;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("user {id} not found")]
    NotFound { id: i32 },

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("timed out waiting for the database")]
    Timeout,

    #[error("storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Self::UniqueViolation(db.message().to_owned())
            }
            sqlx::Error::PoolTimedOut => Self::Timeout,
            err => Self::Storage(err),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Storage contract for users, implemented by [PostgreDatabase] and [MockRepository].
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: i32) -> RepositoryResult<User>;

    /// Up to [USERS_LIMIT] users, newest id first.
    async fn get_users(&self) -> RepositoryResult<Vec<User>>;

    /// Stores `user` and returns its generated id. Only `name` and `email` are read.
    async fn create_user(&self, user: &User) -> RepositoryResult<i32>;

    async fn close(&self) -> RepositoryResult<()>;
}

/// Connects to PostgreSQL, failing with [RepositoryError::Timeout] if no
/// connection can be established within five seconds.
pub async fn connect_sqlx(config: &DbConfig) -> RepositoryResult<PgPool> {
    let options = config.connect_options()?;
    let connect = PgPoolOptions::new()
        .max_connections(25)
        .max_lifetime(Duration::from_secs(5 * 60))
        .acquire_timeout(CONNECT_TIMEOUT)
        .connect_with(options);

    tokio::time::timeout(CONNECT_TIMEOUT, connect)
        .await
        .map_err(|_| RepositoryError::Timeout)?
        .map_err(RepositoryError::from)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
