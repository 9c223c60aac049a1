//! Access token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use hotellisting_core::config::AuthConfig;
use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;

use super::claims::Claims;

/// Validates signature, issuer and lifetime of access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Build a decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let secret = config.signing_secret()?;
        let issuer = config.issuer()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 5; // clock skew
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Decode and validate a compact token string.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::unauthorized("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthorized("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::unauthorized("Invalid token issuer")
                }
                _ => AppError::unauthorized(format!("Token validation failed: {e}")),
            })
    }
}
