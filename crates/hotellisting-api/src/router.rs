//! Route definitions for the HotelListing HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Version 2.0
//! routes live under `/api/2.0`.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cache::CacheLayer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cache = middleware::cache::build_cache_layer(&state.config.server.cache);

    let api_routes = Router::new()
        .merge(country_routes(&cache))
        .merge(hotel_routes(&cache))
        .merge(account_routes())
        .merge(health_routes())
        .nest("/2.0", v2_routes(&cache));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Country CRUD; writes require the Administrator role. Only the GET
/// handlers carry cache headers.
fn country_routes(cache: &CacheLayer) -> Router<AppState> {
    Router::new()
        .route(
            "/country",
            get(handlers::country::list_countries)
                .layer(cache.clone())
                .post(handlers::country::create_country),
        )
        .route(
            "/country/{id}",
            get(handlers::country::get_country)
                .layer(cache.clone())
                .put(handlers::country::update_country)
                .delete(handlers::country::delete_country),
        )
}

/// Hotel CRUD; writes require the Administrator role.
fn hotel_routes(cache: &CacheLayer) -> Router<AppState> {
    Router::new()
        .route(
            "/hotel",
            get(handlers::hotel::list_hotels)
                .layer(cache.clone())
                .post(handlers::hotel::create_hotel),
        )
        .route(
            "/hotel/{id}",
            get(handlers::hotel::get_hotel)
                .layer(cache.clone())
                .put(handlers::hotel::update_hotel)
                .delete(handlers::hotel::delete_hotel),
        )
}

/// Version 2.0: unpaged country listing
fn v2_routes(cache: &CacheLayer) -> Router<AppState> {
    Router::new().route(
        "/country",
        get(handlers::country::list_all_countries).layer(cache.clone()),
    )
}

/// Registration and login
fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account/register", post(handlers::account::register))
        .route("/account/login", post(handlers::account::login))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
