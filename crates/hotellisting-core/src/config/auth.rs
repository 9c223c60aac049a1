//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Environment variable consulted for the signing secret when the
/// configuration files do not provide one.
pub const SIGNING_SECRET_ENV: &str = "KEY";

/// Token issuance configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Value of the `iss` claim and the only issuer accepted on validation.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_lifetime")]
    pub lifetime_minutes: u64,
    /// Symmetric secret for HMAC-SHA256 signing.
    #[serde(default, skip_serializing)]
    pub jwt_secret: Option<String>,
}

impl AuthConfig {
    /// Returns the signing secret, or a configuration error when it is
    /// missing or empty.
    pub fn signing_secret(&self) -> AppResult<&str> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => Err(AppError::configuration(format!(
                "JWT signing secret is not configured (set auth.jwt_secret or {SIGNING_SECRET_ENV})"
            ))),
        }
    }

    /// Returns the issuer, or a configuration error when it is blank.
    pub fn issuer(&self) -> AppResult<&str> {
        let issuer = self.issuer.trim();
        if issuer.is_empty() {
            return Err(AppError::configuration("JWT issuer is not configured"));
        }
        Ok(issuer)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            lifetime_minutes: default_lifetime(),
            jwt_secret: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("lifetime_minutes", &self.lifetime_minutes)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "****"))
            .finish()
    }
}

fn default_issuer() -> String {
    "HotelListingAPI".to_string()
}

fn default_lifetime() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let config = AuthConfig::default();
        let err = config.signing_secret().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_blank_secret_is_rejected() {
        let config = AuthConfig {
            jwt_secret: Some("   ".to_string()),
            ..AuthConfig::default()
        };
        assert!(config.signing_secret().is_err());
    }

    #[test]
    fn test_debug_masks_secret() {
        let config = AuthConfig {
            jwt_secret: Some("super-secret".to_string()),
            ..AuthConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
