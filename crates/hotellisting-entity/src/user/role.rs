//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user may hold. Stored and emitted in token claims by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    /// Ordinary authenticated user.
    User,
    /// May create, update and delete countries and hotels.
    Administrator,
}

impl UserRole {
    /// Role name as stored and placed in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Administrator => "Administrator",
        }
    }

    /// Check if this role is an administrator.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "administrator" => Ok(Self::Administrator),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}
