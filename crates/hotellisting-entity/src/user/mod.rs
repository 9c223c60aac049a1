//! API user entities.

pub mod model;
pub mod role;

pub use model::{ApiUser, NewUser};
pub use role::UserRole;
