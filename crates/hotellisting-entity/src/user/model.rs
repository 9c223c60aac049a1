//! API user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered API user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name (the e-mail address for self-registered users).
    pub username: String,
    /// E-mail address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// E-mail address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Roles to grant, in order.
    pub roles: Vec<UserRole>,
}
