use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chrono::Utc;

use super::{RepositoryError, RepositoryResult, UserRepository, USERS_LIMIT};
use crate::models::User;

/// In-memory [UserRepository] for tests.
///
/// Follows the PostgreSQL contract: ids start at 1, listing is newest first
/// and capped at [USERS_LIMIT], emails are unique. Once closed, every call
/// fails the way a closed pool does.
#[derive(Debug)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

#[derive(Debug)]
struct MockState {
    users: BTreeMap<i32, User>,
    next_id: i32,
    closed: bool,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                users: BTreeMap::new(),
                next_id: 1,
                closed: false,
            }),
        }
    }

    fn open_state(&self) -> RepositoryResult<MutexGuard<'_, MockState>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return Err(RepositoryError::Storage(sqlx::Error::PoolClosed));
        }
        Ok(state)
    }
}

#[async_trait]
impl UserRepository for MockRepository {
    async fn get_user(&self, id: i32) -> RepositoryResult<User> {
        self.open_state()?
            .users
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id })
    }

    async fn get_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self
            .open_state()?
            .users
            .values()
            .rev()
            .take(USERS_LIMIT)
            .cloned()
            .collect())
    }

    async fn create_user(&self, user: &User) -> RepositoryResult<i32> {
        let mut state = self.open_state()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation(format!(
                "duplicate key value violates unique constraint \"users_email_key\": {}",
                user.email
            )));
        }

        let id = state.next_id;
        let now = Utc::now();
        state.users.insert(
            id,
            User {
                id,
                name: user.name.clone(),
                email: user.email.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        state.next_id += 1;

        Ok(id)
    }

    async fn close(&self) -> RepositoryResult<()> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, email: &str) -> User {
        User {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let repo = MockRepository::new();

        assert_eq!(repo.create_user(&user("a", "a@example.com")).await.unwrap(), 1);
        assert_eq!(repo.create_user(&user("b", "b@example.com")).await.unwrap(), 2);

        let stored = repo.get_user(2).await.unwrap();
        assert_eq!(stored.name, "b");
        assert_eq!(stored.email, "b@example.com");
        assert_eq!(stored.created_at, stored.updated_at);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let repo = MockRepository::new();
        let err = repo.get_user(42).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { id: 42 }));
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_capped() {
        let repo = MockRepository::new();
        for i in 0..(USERS_LIMIT + 5) {
            repo.create_user(&user("u", &format!("u{i}@example.com")))
                .await
                .unwrap();
        }

        let users = repo.get_users().await.unwrap();
        assert_eq!(users.len(), USERS_LIMIT);
        assert_eq!(users[0].id, (USERS_LIMIT + 5) as i32);
        assert!(users.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let repo = MockRepository::new();
        repo.create_user(&user("first", "dup@example.com"))
            .await
            .unwrap();

        let err = repo
            .create_user(&user("second", "dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation(_)));
        assert_eq!(repo.get_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_repository_rejects_calls() {
        let repo = MockRepository::new();
        repo.close().await.unwrap();

        assert!(matches!(
            repo.get_users().await,
            Err(RepositoryError::Storage(sqlx::Error::PoolClosed))
        ));
        assert!(repo.create_user(&user("a", "a@example.com")).await.is_err());
    }
}
