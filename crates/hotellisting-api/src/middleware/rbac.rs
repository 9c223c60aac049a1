//! Role guards for handlers.

use hotellisting_core::error::AppError;
use hotellisting_entity::UserRole;

use crate::extractors::AuthUser;

/// Checks that the authenticated user holds `role`.
pub fn require_role(auth: &AuthUser, role: UserRole) -> Result<(), AppError> {
    if auth.has_role(role) {
        return Ok(());
    }
    tracing::warn!(username = %auth.username(), required = %role, "Role check failed");
    Err(AppError::forbidden(format!("{role} role required")))
}

/// Checks that the authenticated user is an administrator.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    require_role(auth, UserRole::Administrator)
}
