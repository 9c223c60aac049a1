//! Typed predicates and include selectors for hotels.

use hotellisting_core::types::filter::{FilterField, FilterOp};

use crate::entity::{Condition, EntityKind, Include, Query, Record};

use super::model::Hotel;

/// Predicates accepted by hotel lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum HotelFilter {
    /// Exact primary key.
    Id(i32),
    /// Exact name.
    Name(String),
    /// Hotels of one country.
    CountryId(i32),
    /// Rating at or above the given value.
    MinRating(f64),
    /// Case-insensitive substring of the name.
    NameContains(String),
}

impl Condition for HotelFilter {
    fn to_condition(&self) -> FilterField {
        match self {
            Self::Id(id) => FilterField::eq("id", *id),
            Self::Name(name) => FilterField::eq("name", name.as_str()),
            Self::CountryId(country_id) => FilterField::eq("country_id", *country_id),
            Self::MinRating(rating) => FilterField::new("rating", FilterOp::Gte, *rating),
            Self::NameContains(needle) => FilterField::contains("name", needle),
        }
    }
}

/// Relationships that can be eagerly loaded with a hotel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotelInclude {
    /// The country referenced by `country_id`.
    Country,
}

impl Include for HotelInclude {
    type Owner = Hotel;

    fn related(&self, owner: &Hotel) -> Query {
        match self {
            Self::Country => Query::filtered(
                EntityKind::Country,
                vec![FilterField::eq("id", owner.country_id)],
            )
            .limit(1),
        }
    }

    fn attach(&self, owner: &mut Hotel, related: Vec<Record>) {
        match self {
            Self::Country => {
                owner.country = related.into_iter().find_map(|record| match record {
                    Record::Country(country) => Some(Box::new(country)),
                    Record::Hotel(_) => None,
                });
            }
        }
    }
}
