//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, storage) = match state.backend.health_check().await {
        Ok(true) => ("ok", StatusCode::OK, "connected"),
        Ok(false) => ("degraded", StatusCode::SERVICE_UNAVAILABLE, "unexpected reply"),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "unreachable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: storage.to_string(),
        }),
    )
}
