//! Core type definitions used across the HotelListing workspace.

pub mod filter;
pub mod pagination;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use pagination::{Page, PageRequest, PageWindow, paginate};
