//! # hotellisting-entity
//!
//! Domain entity models for the HotelListing backend. Every persisted struct
//! derives `Debug`, `Clone`, `Serialize`, `Deserialize` and `sqlx::FromRow`.
//!
//! The [`entity`] module holds the glue the generic repository is written
//! against: the [`Entity`](entity::Entity) trait, typed filters and include
//! selectors, and the type-erased [`Record`](entity::Record) that storage
//! backends exchange.

pub mod country;
pub mod entity;
pub mod hotel;
pub mod user;

pub use country::{Country, CountryFilter, CountryInclude};
pub use entity::{Condition, Entity, EntityKind, Include, Query, Record};
pub use hotel::{Hotel, HotelFilter, HotelInclude};
pub use user::{ApiUser, NewUser, UserRole};
