//! # hotellisting-auth
//!
//! Authentication for the HotelListing API.
//!
//! ## Modules
//!
//! - `jwt`: HS256 access token creation and validation
//! - `password`: Argon2id password hashing
//! - `manager`: credential validation, token issuance and registration

pub mod jwt;
pub mod manager;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use manager::{AuthManager, Credentials, Registration, ValidatedSubject};
pub use password::PasswordHasher;
