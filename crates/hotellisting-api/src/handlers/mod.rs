//! Route handlers organized by domain.

pub mod account;
pub mod country;
pub mod health;
pub mod hotel;
