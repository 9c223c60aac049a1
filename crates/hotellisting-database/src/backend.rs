//! Backend selection from configuration.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use hotellisting_core::config::DatabaseConfig;
use hotellisting_core::error::{AppError, ErrorKind};
use hotellisting_core::result::AppResult;

use crate::schema;
use crate::store::{MemoryStore, PgStore, Store};
use crate::users::{MemoryUserStore, PgUserStore, UserStore};

/// The entity store and user store the server runs against.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Country and hotel storage.
    pub store: Arc<dyn Store>,
    /// API user storage.
    pub users: Arc<dyn UserStore>,
    pool: Option<PgPool>,
}

impl Backend {
    /// Open the backend `config` selects: `memory://` gives a seeded
    /// in-process store, anything else is a PostgreSQL URL.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        if config.is_memory() {
            info!("Using in-memory storage backend");
            return Ok(Self::in_memory());
        }

        let pool = connect(config).await?;
        if config.run_migrations {
            schema::prepare(&pool).await?;
        }
        Ok(Self {
            store: Arc::new(PgStore::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            pool: Some(pool),
        })
    }

    /// A seeded memory backend with no users.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::seeded()),
            users: Arc::new(MemoryUserStore::new()),
            pool: None,
        }
    }

    /// Check storage connectivity. The memory backend is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        let Some(pool) = &self.pool else {
            return Ok(true);
        };
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Health check failed", e))
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Database pool closed");
        }
    }
}

/// Build the PostgreSQL pool with the configured sizing and timeouts.
async fn connect(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to connect to {}", redact_url(&config.url)),
                e,
            )
        })?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Replace the password in a connection URL so it can be logged.
fn redact_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map_or(0, |p| p + 3);
    match url[..at_pos].rfind(':') {
        Some(colon_pos) if colon_pos > scheme_end => {
            format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
