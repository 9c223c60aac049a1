//! HS256 access token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hotellisting_core::config::AuthConfig;
use hotellisting_core::error::AppError;
use hotellisting_core::result::AppResult;
use hotellisting_entity::UserRole;

use super::claims::Claims;

/// A signed access token and its validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiration time.
    pub expires_at: DateTime<Utc>,
}

/// Signs access tokens with the configured secret, issuer and lifetime.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    lifetime: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl JwtEncoder {
    /// Build an encoder, failing with a configuration error when the secret
    /// or issuer is missing, or the lifetime is zero or too large to add to
    /// the current time.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let secret = config.signing_secret()?;
        let issuer = config.issuer()?.to_string();
        let lifetime = i64::try_from(config.lifetime_minutes)
            .ok()
            .filter(|m| *m > 0)
            .and_then(Duration::try_minutes)
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Token lifetime must be a positive number of minutes that keeps \
                     expiry representable, got {}",
                    config.lifetime_minutes
                ))
            })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            issuer,
            lifetime,
        })
    }

    /// Sign a token for `username` issued now.
    pub fn encode(&self, username: &str, roles: &[UserRole]) -> AppResult<IssuedToken> {
        self.encode_at(username, roles, Utc::now())
    }

    /// Sign a token for `username` issued at `issued_at`.
    pub fn encode_at(
        &self,
        username: &str,
        roles: &[UserRole],
        issued_at: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Token issued at {issued_at} would expire past the representable range"
                ))
            })?;
        let claims = Claims {
            unique_name: username.to_string(),
            role: roles.to_vec(),
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::configuration(format!("Failed to sign access token: {e}")))?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }
}
