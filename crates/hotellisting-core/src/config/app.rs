//! Server and CORS configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// HTTP cache header configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_grace_seconds: default_shutdown_grace(),
            cors: CorsConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// `Cache-Control` policy for successful reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Emit `Cache-Control` on successful GET responses.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// `max-age` directive in seconds.
    #[serde(default = "default_cache_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_age_seconds: default_cache_max_age(),
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// The defaults allow any origin, method and header, matching the
/// "allow all" policy the public listing endpoints are served with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (`["*"]` allows any).
    #[serde(default = "default_wildcard")]
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods.
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,
    /// Allowed HTTP headers (`["*"]` allows any).
    #[serde(default = "default_wildcard")]
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_wildcard(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_wildcard(),
            max_age_seconds: default_max_age(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_grace() -> u64 {
    30
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_age() -> u64 {
    120
}

fn default_wildcard() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_max_age() -> u64 {
    3600
}
