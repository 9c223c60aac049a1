//! Hotel domain entities.

pub mod filter;
pub mod model;

pub use filter::{HotelFilter, HotelInclude};
pub use model::Hotel;
