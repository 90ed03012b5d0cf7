//! User registration.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::store::SleepStore;

pub struct UserService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: SleepStore> UserService<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a user with a unique handle.
    pub async fn register(&self, handle: &str, name: &str) -> Result<User> {
        let user = User::new(handle.trim(), name.trim(), self.clock.now());
        if !self.store.insert_user(user.clone()).await? {
            return Err(AppError::InvalidRequest(format!(
                "Handle '{}' is already taken",
                user.handle
            )));
        }

        info!(user_id = %user.id, handle = %user.handle, "User registered");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.store.get_user(id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn find_by_handle(&self, handle: &str) -> Result<User> {
        self.store
            .find_user_by_handle(handle.trim())
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    #[tokio::test]
    async fn test_register_and_get() {
        let fx = Fixture::new();
        let users = fx.users();

        let bob = users.register(" bob ", "Bob").await.unwrap();
        assert_eq!(bob.handle, "bob");
        assert_eq!(users.get(bob.id).await.unwrap(), bob);
        assert_eq!(users.find_by_handle("bob").await.unwrap(), bob);
    }

    #[tokio::test]
    async fn test_register_duplicate_handle() {
        let fx = Fixture::new();
        let users = fx.users();
        users.register("bob", "Bob").await.unwrap();

        let result = users.register("bob", "Another Bob").await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let fx = Fixture::new();
        assert!(matches!(fx.users().get(Uuid::now_v7()).await, Err(AppError::UserNotFound)));
    }
}
