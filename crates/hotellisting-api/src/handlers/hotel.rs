//! Hotel handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use tracing::info;
use validator::Validate;

use hotellisting_core::error::AppError;
use hotellisting_entity::{Hotel, HotelInclude};

use crate::dto::request::HotelRequest;
use crate::dto::response::HotelResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, EntityId};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/hotel
pub async fn list_hotels(
    State(state): State<AppState>,
) -> Result<Json<Vec<HotelResponse>>, ApiError> {
    let mut uow = state.uow.begin();
    let hotels = uow.hotels().get_all().await?;
    Ok(Json(hotels.into_iter().map(HotelResponse::from).collect()))
}

/// GET /api/hotel/{id}
pub async fn get_hotel(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<HotelResponse>, ApiError> {
    let mut uow = state.uow.begin();
    let hotel = uow
        .hotels()
        .get_by_id(id, &[HotelInclude::Country])
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {id} not found")))?;
    Ok(Json(hotel.into()))
}

/// POST /api/hotel
pub async fn create_hotel(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<HotelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&auth)?;
    req.validate()?;

    let hotel = req.into_hotel();
    let mut uow = state.uow.begin();
    let ticket = uow.hotels().insert(hotel.clone())?;
    uow.save().await?;
    let id = uow
        .assigned_id(&ticket)
        .ok_or_else(|| AppError::internal("Saved hotel has no identity"))?;

    info!(hotel_id = id, country_id = hotel.country_id, by = %auth.username(), "Hotel created");
    let created = Hotel { id, ..hotel };
    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/hotel/{id}"))],
        Json(HotelResponse::from(created)),
    ))
}

/// PUT /api/hotel/{id}
pub async fn update_hotel(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityId(id): EntityId,
    Json(req): Json<HotelRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    req.validate()?;

    let mut uow = state.uow.begin();
    let mut hotel = uow
        .hotels()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {id} not found")))?;
    req.apply_to(&mut hotel);
    uow.hotels().update(hotel)?;
    uow.save().await?;

    info!(hotel_id = id, by = %auth.username(), "Hotel updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/hotel/{id}
pub async fn delete_hotel(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;

    let mut uow = state.uow.begin();
    uow.hotels().delete(id)?;
    uow.save().await?;

    info!(hotel_id = id, by = %auth.username(), "Hotel deleted");
    Ok(StatusCode::NO_CONTENT)
}
