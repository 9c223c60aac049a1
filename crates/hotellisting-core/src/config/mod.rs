//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `HOTELLISTING__`-prefixed environment variables. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod pagination;

use serde::{Deserialize, Serialize};

pub use self::app::{CacheConfig, CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::pagination::PaginationConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Token issuance settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Page-size limits.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with the `config/{env}.toml` overlay and
    /// environment variables prefixed with `HOTELLISTING__`. When no signing
    /// secret is configured, the `KEY` environment variable is used.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("HOTELLISTING")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if app_config.auth.jwt_secret.is_none() {
            app_config.auth.jwt_secret = std::env::var(auth::SIGNING_SECRET_ENV).ok();
        }

        Ok(app_config)
    }

    /// Configuration backed by the memory store with the given signing secret.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::in_memory(),
            auth: AuthConfig {
                jwt_secret: Some(jwt_secret.into()),
                ..AuthConfig::default()
            },
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
