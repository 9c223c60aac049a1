//! Convenience result type alias for HotelListing.

use crate::error::AppError;

/// A specialized `Result` type for HotelListing operations.
pub type AppResult<T> = Result<T, AppError>;
