//! # hotellisting-core
//!
//! Core crate for the HotelListing backend. Contains configuration schemas,
//! the unified error system, filter conditions and the pagination engine.
//!
//! This crate has **no** internal dependencies on other HotelListing crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
