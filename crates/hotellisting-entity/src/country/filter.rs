//! Typed predicates and include selectors for countries.

use hotellisting_core::types::filter::FilterField;

use crate::entity::{Condition, EntityKind, Include, Query, Record};
use crate::hotel::Hotel;

use super::model::Country;

/// Predicates accepted by country lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum CountryFilter {
    /// Exact primary key.
    Id(i32),
    /// Exact name.
    Name(String),
    /// Exact two-letter short name.
    ShortName(String),
    /// Case-insensitive substring of the name.
    NameContains(String),
}

impl Condition for CountryFilter {
    fn to_condition(&self) -> FilterField {
        match self {
            Self::Id(id) => FilterField::eq("id", *id),
            Self::Name(name) => FilterField::eq("name", name.as_str()),
            Self::ShortName(short) => FilterField::eq("short_name", short.as_str()),
            Self::NameContains(needle) => FilterField::contains("name", needle),
        }
    }
}

/// Relationships that can be eagerly loaded with a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryInclude {
    /// Every hotel whose `country_id` references the country.
    Hotels,
}

impl Include for CountryInclude {
    type Owner = Country;

    fn related(&self, owner: &Country) -> Query {
        match self {
            Self::Hotels => Query::filtered(
                EntityKind::Hotel,
                vec![FilterField::eq("country_id", owner.id)],
            ),
        }
    }

    fn attach(&self, owner: &mut Country, related: Vec<Record>) {
        match self {
            Self::Hotels => {
                let hotels = related
                    .into_iter()
                    .filter_map(|record| match record {
                        Record::Hotel(hotel) => Some(hotel),
                        Record::Country(_) => None,
                    })
                    .collect::<Vec<Hotel>>();
                owner.hotels = Some(hotels);
            }
        }
    }
}
