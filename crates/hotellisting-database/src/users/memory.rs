//! In-process user store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;
use hotellisting_entity::{ApiUser, NewUser, UserRole};

use super::UserStore;

#[derive(Debug)]
struct StoredUser {
    user: ApiUser,
    roles: Vec<UserRole>,
}

/// User store that keeps accounts in process memory, keyed by lowercase
/// username.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<ApiUser>> {
        let users = self.users.read().await;
        Ok(users
            .get(&username.to_lowercase())
            .map(|stored| stored.user.clone()))
    }

    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<UserRole>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|stored| stored.user.id == user_id)
            .map(|stored| stored.roles.clone())
            .unwrap_or_default())
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<ApiUser> {
        let mut users = self.users.write().await;
        let key = new_user.username.to_lowercase();
        if users.contains_key(&key) {
            return Err(AppError::constraint_violation(format!(
                "Username '{}' is already taken",
                new_user.username
            )));
        }

        let mut roles = Vec::with_capacity(new_user.roles.len());
        for role in new_user.roles {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        let user = ApiUser {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(
            key,
            StoredUser {
                user: user.clone(),
                roles,
            },
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotellisting_core::error::ErrorKind;

    fn new_user(username: &str, roles: Vec<UserRole>) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: username.to_string(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            password_hash: "hash".into(),
            roles,
        }
    }

    #[tokio::test]
    async fn test_lookup_ignores_case() {
        let store = MemoryUserStore::new();
        let created = store
            .create_user(new_user("Jane@Example.com", vec![UserRole::User]))
            .await
            .unwrap();
        let found = store.find_by_username("jane@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[tokio::test]
    async fn test_roles_keep_grant_order() {
        let store = MemoryUserStore::new();
        let user = store
            .create_user(new_user(
                "admin@example.com",
                vec![UserRole::Administrator, UserRole::User, UserRole::Administrator],
            ))
            .await
            .unwrap();
        assert_eq!(
            store.roles_of(user.id).await.unwrap(),
            vec![UserRole::Administrator, UserRole::User]
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryUserStore::new();
        store
            .create_user(new_user("jane@example.com", vec![]))
            .await
            .unwrap();
        let err = store
            .create_user(new_user("JANE@example.com", vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ConstraintViolation);
    }
}
