//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use hotellisting_entity::{Country, Hotel, UserRole};

/// Body of `POST /api/country` and `PUT /api/country/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CountryRequest {
    /// Country name.
    #[validate(length(min = 2, max = 100, message = "Country name must be 2-100 characters"))]
    pub name: String,
    /// Two-letter short name.
    #[validate(length(equal = 2, message = "Short name must be exactly 2 characters"))]
    pub short_name: String,
}

impl CountryRequest {
    /// A new, unsaved country.
    pub fn into_country(self) -> Country {
        Country::new(self.name, self.short_name)
    }

    /// Overwrite the editable fields of `country`.
    pub fn apply_to(self, country: &mut Country) {
        country.name = self.name;
        country.short_name = self.short_name;
    }
}

/// Body of `POST /api/hotel` and `PUT /api/hotel/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HotelRequest {
    /// Hotel name.
    #[validate(length(min = 2, max = 100, message = "Hotel name must be 2-100 characters"))]
    pub name: String,
    /// Hotel address.
    #[validate(length(min = 5, max = 250, message = "Hotel address must be 5-250 characters"))]
    pub address: String,
    /// Star rating.
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f64,
    /// Owning country.
    #[validate(range(min = 1, message = "A country id is required"))]
    pub country_id: i32,
}

impl HotelRequest {
    /// A new, unsaved hotel.
    pub fn into_hotel(self) -> Hotel {
        Hotel::new(self.name, self.address, self.rating, self.country_id)
    }

    /// Overwrite the editable fields of `hotel`.
    pub fn apply_to(self, hotel: &mut Hotel) {
        hotel.name = self.name;
        hotel.address = self.address;
        hotel.rating = self.rating;
        hotel.country_id = self.country_id;
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// E-mail address used as the username.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// E-mail address, which becomes the username.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, max = 15, message = "Password must be 6-15 characters"))]
    pub password: String,
    /// Given name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
    /// Roles to grant.
    #[serde(default)]
    pub roles: Vec<UserRole>,
}
