//! Typed path parameter helpers.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use hotellisting_core::error::AppError;

use crate::error::ApiError;

/// A `{id}` path segment that parsed as an integer of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i32);

/// Parses an entity key, rejecting anything below 1.
pub fn parse_entity_id(raw: &str) -> Result<i32, AppError> {
    match raw.parse::<i32>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::invalid_argument(format!("Invalid id: {raw}"))),
    }
}

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::invalid_argument(e.body_text()))?;
        Ok(EntityId(parse_entity_id(&raw)?))
    }
}
