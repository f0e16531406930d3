//! Business logic between the HTTP handlers and the repository.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{RepositoryError, UserRepository},
    models::{
        dto::{CreateUserRequest, UserResponse},
        User,
    },
};

/// Repository failure annotated with the operation that hit it.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("service error - get user: {0}")]
    GetUser(#[source] RepositoryError),

    #[error("service error - get users: {0}")]
    GetUsers(#[source] RepositoryError),

    #[error("service error - create user: {0}")]
    CreateUser(#[source] RepositoryError),
}

impl ServiceError {
    pub fn repository_error(&self) -> &RepositoryError {
        match self {
            Self::GetUser(err) | Self::GetUsers(err) | Self::CreateUser(err) => err,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_user(&self, id: i32) -> Result<UserResponse, ServiceError> {
        let user = self.repo.get_user(id).await.map_err(ServiceError::GetUser)?;
        Ok(user.into())
    }

    pub async fn get_users(&self) -> Result<Vec<UserResponse>, ServiceError> {
        let users = self.repo.get_users().await.map_err(ServiceError::GetUsers)?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Returns the id assigned by the repository.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<i32, ServiceError> {
        let user = User {
            name: req.name,
            email: req.email,
            ..Default::default()
        };

        self.repo
            .create_user(&user)
            .await
            .map_err(ServiceError::CreateUser)
    }

    pub async fn close(&self) -> Result<(), RepositoryError> {
        self.repo.close().await
    }
}
