//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use hotellisting_auth::{AuthManager, JwtDecoder};
use hotellisting_core::config::AppConfig;
use hotellisting_core::result::AppResult;
use hotellisting_database::{Backend, UnitOfWorkFactory};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Storage backend.
    pub backend: Backend,
    /// Opens one unit of work per request.
    pub uow: UnitOfWorkFactory,
    /// Credential validation and token issuance.
    pub auth_manager: Arc<AuthManager>,
    /// Bearer token validation.
    pub jwt_decoder: Arc<JwtDecoder>,
}

impl AppState {
    /// Wire the state from configuration and an open backend.
    ///
    /// Fails with a configuration error when the signing secret or issuer is
    /// missing.
    pub fn new(config: AppConfig, backend: Backend) -> AppResult<Self> {
        let auth_manager = AuthManager::new(&config.auth, Arc::clone(&backend.users))?;
        let jwt_decoder = JwtDecoder::new(&config.auth)?;
        let uow = UnitOfWorkFactory::new(
            Arc::clone(&backend.store),
            config.pagination.max_page_size,
        );

        Ok(Self {
            config: Arc::new(config),
            backend,
            uow,
            auth_manager: Arc::new(auth_manager),
            jwt_decoder: Arc::new(jwt_decoder),
        })
    }
}
