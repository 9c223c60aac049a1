//! Country entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::entity::{Entity, EntityKind, Record};
use crate::hotel::Hotel;

use super::filter::{CountryFilter, CountryInclude};

/// A country that owns zero or more hotels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Country {
    /// Surrogate key, `0` until the first commit assigns one.
    pub id: i32,
    /// Display name.
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    /// Two-letter short name.
    #[validate(length(equal = 2))]
    pub short_name: String,
    /// Hotels located in this country, present only when eagerly loaded.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<Hotel>>,
}

impl Country {
    /// Build a country that has not been persisted yet.
    pub fn new(name: impl Into<String>, short_name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            short_name: short_name.into(),
            hotels: None,
        }
    }
}

impl Entity for Country {
    type Filter = CountryFilter;
    type Include = CountryInclude;

    const KIND: EntityKind = EntityKind::Country;

    fn id(&self) -> i32 {
        self.id
    }

    fn id_filter(id: i32) -> CountryFilter {
        CountryFilter::Id(id)
    }

    fn into_record(self) -> Record {
        Record::Country(self)
    }

    fn from_record(record: Record) -> Option<Self> {
        match record {
            Record::Country(country) => Some(country),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotellisting_core::error::ErrorKind;

    #[test]
    fn test_valid_country() {
        assert!(Country::new("Jamaica", "JM").check_fields().is_ok());
    }

    #[test]
    fn test_short_name_must_be_two_letters() {
        let err = Country::new("Jamaica", "JAM").check_fields().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_name_too_short() {
        assert!(Country::new("J", "JM").check_fields().is_err());
    }

    #[test]
    fn test_hotels_omitted_when_not_loaded() {
        let json = serde_json::to_value(Country::new("Bahamas", "BS")).unwrap();
        assert!(json.get("hotels").is_none());
    }
}
