//! Traits and type-erased records shared by the repository and the storage
//! backends.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use validator::Validate;

use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;
use hotellisting_core::types::filter::{FilterField, FilterValue};

use crate::country::Country;
use crate::hotel::Hotel;

/// The closed set of persisted entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `countries` table.
    Country,
    /// `hotels` table.
    Hotel,
}

impl EntityKind {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Country => "countries",
            Self::Hotel => "hotels",
        }
    }

    /// Columns that filters may reference.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Country => &["id", "name", "short_name"],
            Self::Hotel => &["id", "name", "address", "rating", "country_id"],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country => write!(f, "Country"),
            Self::Hotel => write!(f, "Hotel"),
        }
    }
}

/// A persisted row of any entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A country row.
    Country(Country),
    /// A hotel row.
    Hotel(Hotel),
}

impl Record {
    /// The kind of entity this record holds.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Country(_) => EntityKind::Country,
            Self::Hotel(_) => EntityKind::Hotel,
        }
    }

    /// Primary key (`0` when not yet assigned).
    pub fn id(&self) -> i32 {
        match self {
            Self::Country(country) => country.id,
            Self::Hotel(hotel) => hotel.id,
        }
    }

    /// Assign the primary key. Only storage backends call this, once, when
    /// the row is first written.
    pub fn assign_id(&mut self, id: i32) {
        match self {
            Self::Country(country) => country.id = id,
            Self::Hotel(hotel) => hotel.id = id,
        }
    }

    /// Value of a filterable column.
    pub fn column(&self, name: &str) -> Option<FilterValue> {
        match (self, name) {
            (_, "id") => Some(self.id().into()),
            (Self::Country(c), "name") => Some(c.name.as_str().into()),
            (Self::Country(c), "short_name") => Some(c.short_name.as_str().into()),
            (Self::Hotel(h), "name") => Some(h.name.as_str().into()),
            (Self::Hotel(h), "address") => Some(h.address.as_str().into()),
            (Self::Hotel(h), "rating") => Some(h.rating.into()),
            (Self::Hotel(h), "country_id") => Some(h.country_id.into()),
            _ => None,
        }
    }

    /// Whether every condition holds for this record.
    pub fn matches(&self, conditions: &[FilterField]) -> bool {
        conditions.iter().all(|condition| {
            self.column(condition.field)
                .is_some_and(|actual| condition.matches(&actual))
        })
    }

    /// Drop eagerly loaded relations so only column data remains.
    pub fn detached(self) -> Self {
        match self {
            Self::Country(country) => Self::Country(Country {
                hotels: None,
                ..country
            }),
            Self::Hotel(hotel) => Self::Hotel(Hotel {
                country: None,
                ..hotel
            }),
        }
    }
}

/// A storage-level query: conditions are ANDed, results come back ordered by
/// primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Entity kind to read.
    pub kind: EntityKind,
    /// Conditions that must all hold.
    pub conditions: Vec<FilterField>,
    /// Maximum number of rows to return.
    pub limit: Option<u64>,
}

impl Query {
    /// Every row of `kind`.
    pub fn all(kind: EntityKind) -> Self {
        Self {
            kind,
            conditions: Vec::new(),
            limit: None,
        }
    }

    /// Rows of `kind` matching every condition.
    pub fn filtered(kind: EntityKind, conditions: Vec<FilterField>) -> Self {
        Self {
            kind,
            conditions,
            limit: None,
        }
    }

    /// Restrict the number of returned rows.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A typed predicate that lowers to a single column condition.
pub trait Condition {
    /// The column condition this predicate stands for.
    fn to_condition(&self) -> FilterField;
}

/// A typed one-hop relationship selector.
pub trait Include: fmt::Debug + Copy + Eq + Hash + Send + Sync + 'static {
    /// The entity the relationship starts from.
    type Owner;

    /// Query that loads the related rows of `owner`.
    fn related(&self, owner: &Self::Owner) -> Query;

    /// Store the loaded rows on `owner`.
    fn attach(&self, owner: &mut Self::Owner, related: Vec<Record>);
}

/// A persisted domain record with a stable integer identity.
pub trait Entity:
    fmt::Debug + Clone + PartialEq + Serialize + Validate + Send + Sync + 'static
{
    /// Typed predicate accepted by repository lookups.
    type Filter: Condition + fmt::Debug + Clone + Send + Sync + 'static;
    /// Typed relationship selectors for eager loading.
    type Include: Include<Owner = Self>;

    /// Which table this entity lives in.
    const KIND: EntityKind;

    /// Primary key (`0` when not yet assigned).
    fn id(&self) -> i32;

    /// Filter selecting a single identity.
    fn id_filter(id: i32) -> Self::Filter;

    /// Erase the type for storage.
    fn into_record(self) -> Record;

    /// Recover the typed entity; `None` if the record has another kind.
    fn from_record(record: Record) -> Option<Self>;

    /// Check field bounds before a mutation is staged.
    fn check_fields(&self) -> AppResult<()> {
        self.validate().map_err(|e| {
            AppError::invalid_argument(format!("Invalid {}: {e}", Self::KIND))
        })
    }
}
