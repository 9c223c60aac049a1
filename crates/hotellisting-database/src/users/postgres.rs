//! PostgreSQL user store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use hotellisting_core::error::{AppError, ErrorKind};
use hotellisting_core::result::AppResult;
use hotellisting_entity::{ApiUser, NewUser, UserRole};

use super::UserStore;

/// User store backed by the `users` and `user_roles` tables.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a user store over an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Storage, format!("{context}: {e}"), e)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<ApiUser>> {
        sqlx::query_as::<_, ApiUser>(
            "SELECT id, username, email, first_name, last_name, password_hash, created_at \
             FROM users WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage("Failed to find user by username"))
    }

    async fn roles_of(&self, user_id: Uuid) -> AppResult<Vec<UserRole>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY granted_order",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage("Failed to load user roles"))?;

        Ok(names
            .into_iter()
            .filter_map(|name| match name.parse::<UserRole>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Ignoring unknown role");
                    None
                }
            })
            .collect())
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<ApiUser> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to begin transaction"))?;

        let user = sqlx::query_as::<_, ApiUser>(
            "INSERT INTO users (id, username, email, first_name, last_name, password_hash) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, username, email, first_name, last_name, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return AppError::constraint_violation(format!(
                        "Username '{}' is already taken",
                        new_user.username
                    ));
                }
            }
            AppError::with_source(ErrorKind::Storage, "Failed to create user", e)
        })?;

        let mut granted: Vec<UserRole> = Vec::new();
        for role in new_user.roles {
            if granted.contains(&role) {
                continue;
            }
            sqlx::query("INSERT INTO user_roles (user_id, role, granted_order) VALUES ($1, $2, $3)")
                .bind(user.id)
                .bind(role.as_str())
                .bind(granted.len() as i16)
                .execute(&mut *tx)
                .await
                .map_err(storage("Failed to grant role"))?;
            granted.push(role);
        }

        tx.commit()
            .await
            .map_err(storage("Failed to commit user creation"))?;
        Ok(user)
    }
}
