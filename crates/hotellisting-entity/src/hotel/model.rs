//! Hotel entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::country::Country;
use crate::entity::{Entity, EntityKind, Record};

use super::filter::{HotelFilter, HotelInclude};

/// A hotel belonging to exactly one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Hotel {
    /// Surrogate key, `0` until the first commit assigns one.
    pub id: i32,
    /// Display name.
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    /// Street address or town.
    #[validate(length(min = 5, max = 250))]
    pub address: String,
    /// Star rating between 1 and 5.
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
    /// Owning country.
    pub country_id: i32,
    /// The owning country, present only when eagerly loaded.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Box<Country>>,
}

impl Hotel {
    /// Build a hotel that has not been persisted yet.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        rating: f64,
        country_id: i32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            address: address.into(),
            rating,
            country_id,
            country: None,
        }
    }
}

impl Entity for Hotel {
    type Filter = HotelFilter;
    type Include = HotelInclude;

    const KIND: EntityKind = EntityKind::Hotel;

    fn id(&self) -> i32 {
        self.id
    }

    fn id_filter(id: i32) -> HotelFilter {
        HotelFilter::Id(id)
    }

    fn into_record(self) -> Record {
        Record::Hotel(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Hotel(hotel) => Some(hotel),
            _ => None,
        }
    }
}
