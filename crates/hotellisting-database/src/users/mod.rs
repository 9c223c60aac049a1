//! API user storage consumed by the auth manager.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use hotellisting_core::result::AppResult;
use hotellisting_entity::{ApiUser, NewUser, UserRole};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Lookup and creation of API users.
#[async_trait]
pub trait UserStore: Send + Sync + fmt::Debug {
    /// Find a user by username, ignoring case.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<ApiUser>>;

    /// Roles granted to a user, in store order.
    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<UserRole>>;

    /// Create a user and grant the requested roles.
    ///
    /// A username that is already taken is a `ConstraintViolation`.
    async fn create_user(&self, user: NewUser) -> AppResult<ApiUser>;
}
