//! Country handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use tracing::info;
use validator::Validate;

use hotellisting_core::error::AppError;
use hotellisting_core::types::pagination::Page;
use hotellisting_entity::{Country, CountryInclude};

use crate::dto::request::CountryRequest;
use crate::dto::response::CountryResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, EntityId, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/country?pageNumber=&pageSize=
pub async fn list_countries(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<CountryResponse>>, ApiError> {
    let request = params.into_page_request(&state.config.pagination);
    let mut uow = state.uow.begin();
    let page = uow.countries().get_paged_list(&request).await?;
    Ok(Json(page.map(CountryResponse::from)))
}

/// GET /api/2.0/country
///
/// Version 2.0 of the listing: every country, unpaged.
pub async fn list_all_countries(
    State(state): State<AppState>,
) -> Result<Json<Vec<CountryResponse>>, ApiError> {
    let mut uow = state.uow.begin();
    let countries = uow.countries().get_all().await?;
    Ok(Json(countries.into_iter().map(CountryResponse::from).collect()))
}

/// GET /api/country/{id}
pub async fn get_country(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Json<CountryResponse>, ApiError> {
    let mut uow = state.uow.begin();
    let country = uow
        .countries()
        .get_by_id(id, &[CountryInclude::Hotels])
        .await?
        .ok_or_else(|| AppError::not_found(format!("Country {id} not found")))?;
    Ok(Json(country.into()))
}

/// POST /api/country
pub async fn create_country(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CountryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&auth)?;
    req.validate()?;

    let country = req.into_country();
    let mut uow = state.uow.begin();
    let ticket = uow.countries().insert(country.clone())?;
    uow.save().await?;
    let id = uow
        .assigned_id(&ticket)
        .ok_or_else(|| AppError::internal("Saved country has no identity"))?;

    info!(country_id = id, by = %auth.username(), "Country created");
    let created = Country { id, ..country };
    Ok((
        StatusCode::CREATED,
        [(LOCATION, format!("/api/country/{id}"))],
        Json(CountryResponse::from(created)),
    ))
}

/// PUT /api/country/{id}
pub async fn update_country(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityId(id): EntityId,
    Json(req): Json<CountryRequest>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    req.validate()?;

    let mut uow = state.uow.begin();
    let mut country = uow
        .countries()
        .get_by_id(id, &[])
        .await?
        .ok_or_else(|| AppError::not_found(format!("Country {id} not found")))?;
    req.apply_to(&mut country);
    uow.countries().update(country)?;
    uow.save().await?;

    info!(country_id = id, by = %auth.username(), "Country updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/country/{id}
pub async fn delete_country(
    State(state): State<AppState>,
    auth: AuthUser,
    EntityId(id): EntityId,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;

    let mut uow = state.uow.begin();
    uow.countries().delete(id)?;
    uow.save().await?;

    info!(country_id = id, by = %auth.username(), "Country deleted");
    Ok(StatusCode::NO_CONTENT)
}
