//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hotellisting_auth::IssuedToken;
use hotellisting_entity::{Country, Hotel};

/// A country as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryResponse {
    /// Identity.
    pub id: i32,
    /// Name.
    pub name: String,
    /// Two-letter short name.
    pub short_name: String,
    /// Hotels, when loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<HotelResponse>>,
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
            short_name: country.short_name,
            hotels: country
                .hotels
                .map(|hotels| hotels.into_iter().map(HotelResponse::from).collect()),
        }
    }
}

/// A hotel as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    /// Identity.
    pub id: i32,
    /// Name.
    pub name: String,
    /// Address.
    pub address: String,
    /// Star rating.
    pub rating: f64,
    /// Owning country.
    pub country_id: i32,
    /// The owning country, when loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Box<CountryResponse>>,
}

impl From<Hotel> for HotelResponse {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            address: hotel.address,
            rating: hotel.rating,
            country_id: hotel.country_id,
            country: hotel
                .country
                .map(|country| Box::new(CountryResponse::from(*country))),
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed access token.
    pub token: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_at: issued.expires_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Storage connectivity.
    pub storage: String,
}
