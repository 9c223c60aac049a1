//! Credential validation, token issuance and registration.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use hotellisting_core::config::AuthConfig;
use hotellisting_core::error::{AppError, ErrorKind};
use hotellisting_core::result::AppResult;
use hotellisting_database::UserStore;
use hotellisting_entity::{ApiUser, NewUser, UserRole};

use crate::jwt::{IssuedToken, JwtEncoder};
use crate::password::PasswordHasher;

/// Username and password supplied at login.
#[derive(Clone)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Bundle a username and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// A subject whose credentials have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubject {
    /// User identifier.
    pub user_id: Uuid,
    /// Canonical username as stored.
    pub username: String,
}

/// A self-service registration request.
#[derive(Clone)]
pub struct Registration {
    /// E-mail address, also used as the username.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Roles to grant.
    pub roles: Vec<UserRole>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Validates credentials against the user store and issues access tokens.
///
/// Unknown users and wrong passwords fail identically: both perform one
/// Argon2 verification and both return the same `InvalidCredentials` error.
#[derive(Debug, Clone)]
pub struct AuthManager {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    dummy_hash: String,
}

impl AuthManager {
    /// Build a manager. Signing configuration problems surface here as
    /// `Configuration` errors rather than at first login.
    pub fn new(config: &AuthConfig, users: Arc<dyn UserStore>) -> AppResult<Self> {
        let encoder = JwtEncoder::new(config)?;
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash_password(&Uuid::new_v4().to_string())?;
        Ok(Self {
            users,
            hasher,
            encoder,
            dummy_hash,
        })
    }

    /// Check a username and password.
    pub async fn verify_credentials(&self, credentials: &Credentials) -> AppResult<ValidatedSubject> {
        let user = match self.users.find_by_username(&credentials.username).await {
            Ok(user) => user,
            Err(e) => {
                error!(username = %credentials.username, error = %e, "User lookup failed");
                None
            }
        };

        let Some(user) = user else {
            // Same Argon2 work as a real mismatch.
            let _ = self
                .hasher
                .verify_password(&credentials.password, &self.dummy_hash);
            warn!(username = %credentials.username, "Login failed");
            return Err(AppError::invalid_credentials());
        };

        match self
            .hasher
            .verify_password(&credentials.password, &user.password_hash)
        {
            Ok(true) => Ok(ValidatedSubject {
                user_id: user.id,
                username: user.username,
            }),
            Ok(false) => {
                warn!(username = %credentials.username, "Login failed");
                Err(AppError::invalid_credentials())
            }
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Password verification error");
                Err(AppError::invalid_credentials())
            }
        }
    }

    /// Boolean form of [`Self::verify_credentials`].
    pub async fn validate_credentials(&self, credentials: &Credentials) -> bool {
        self.verify_credentials(credentials).await.is_ok()
    }

    /// Sign a token carrying the subject's username and roles.
    pub async fn issue_token(&self, subject: &ValidatedSubject) -> AppResult<IssuedToken> {
        let roles = self.users.roles_of(subject.user_id).await?;
        let issued = self.encoder.encode(&subject.username, &roles)?;
        info!(
            user_id = %subject.user_id,
            roles = roles.len(),
            expires_at = %issued.expires_at,
            "Access token issued"
        );
        Ok(issued)
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<IssuedToken> {
        let subject = self.verify_credentials(credentials).await?;
        self.issue_token(&subject).await
    }

    /// Create a user whose username is their e-mail address.
    pub async fn register(&self, registration: Registration) -> AppResult<ApiUser> {
        let password_hash = self.hasher.hash_password(&registration.password)?;
        let new_user = NewUser {
            username: registration.email.clone(),
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
            password_hash,
            roles: registration.roles,
        };

        match self.users.create_user(new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(e) => {
                if !e.is(ErrorKind::ConstraintViolation) {
                    error!(error = %e, "User registration failed");
                }
                Err(e)
            }
        }
    }
}
