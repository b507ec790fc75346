//! Registry of users who have started the bot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classmate_core::UserIdentity;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Chat identity.
    pub id: UserIdentity,
    /// When `/start` was first seen.
    pub registered_at: DateTime<Utc>,
}

/// Storage for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers `user`. Registering twice keeps the first registration.
    ///
    /// # Errors
    ///
    /// Returns a description of the storage failure.
    async fn create_user(&self, user: UserIdentity) -> Result<RegisteredUser, String>;

    /// Whether `user` has registered.
    ///
    /// # Errors
    ///
    /// Returns a description of the storage failure.
    async fn user_exists(&self, user: UserIdentity) -> Result<bool, String>;
}

/// In-process user registry.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserIdentity, RegisteredUser>>,
}

impl InMemoryUserRepository {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: UserIdentity) -> Result<RegisteredUser, String> {
        let mut users = self.users.write().await;
        let registered = users.entry(user).or_insert_with(|| {
            tracing::info!(%user, "Registered new user");
            RegisteredUser {
                id: user,
                registered_at: Utc::now(),
            }
        });
        Ok(registered.clone())
    }

    async fn user_exists(&self, user: UserIdentity) -> Result<bool, String> {
        Ok(self.users.read().await.contains_key(&user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_exists() {
        let repo = InMemoryUserRepository::new();
        let user = UserIdentity::new(42);

        assert_eq!(repo.user_exists(user).await, Ok(false));
        repo.create_user(user).await.expect("create");
        assert_eq!(repo.user_exists(user).await, Ok(true));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn second_registration_keeps_first() {
        let repo = InMemoryUserRepository::new();
        let user = UserIdentity::new(42);

        let first = repo.create_user(user).await.expect("create");
        let second = repo.create_user(user).await.expect("create");

        assert_eq!(first, second);
        assert_eq!(repo.len().await, 1);
    }
}
