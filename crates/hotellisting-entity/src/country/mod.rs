//! Country domain entities.

pub mod filter;
pub mod model;

pub use filter::{CountryFilter, CountryInclude};
pub use model::Country;
