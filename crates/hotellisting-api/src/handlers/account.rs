//! Account handlers: registration and login.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;
use validator::Validate;

use hotellisting_auth::{Credentials, Registration};

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::LoginResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/account/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    info!(email = %req.email, "Registration attempt");
    req.validate()?;

    state
        .auth_manager
        .register(Registration {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            roles: req.roles,
        })
        .await?;

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/account/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    info!(email = %req.email, "Login attempt");
    req.validate()?;

    let issued = state
        .auth_manager
        .login(&Credentials::new(req.email, req.password))
        .await?;

    Ok((StatusCode::ACCEPTED, Json(issued.into())))
}
