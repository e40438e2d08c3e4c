//! User service
//!
//! Implements business logic for accounts and authentication:
//! - Registration (uniqueness checks precede any write)
//! - Login/logout
//! - Session issue and validation
//!
//! Password hashing is delegated to `services::password`.

use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use std::sync::Arc;

/// Default session lifetime in days
const DEFAULT_SESSION_DAYS: i64 = 7;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials); deliberately carries no
    /// detail about which part was wrong
    #[error("Authentication failed")]
    AuthenticationError,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Username already taken
    #[error("Username '{0}' is already taken")]
    UsernameExists(String),

    /// Email already registered
    #[error("Email '{0}' is already registered")]
    EmailExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// User service for accounts and sessions
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_days: i64,
}

impl UserService {
    /// Create a new user service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_days: DEFAULT_SESSION_DAYS,
        }
    }

    /// Register a new user.
    ///
    /// Both uniqueness checks run before anything is written, so a failed
    /// registration leaves no partial state.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();

        if username.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username, email and password are required".to_string(),
            ));
        }

        if self
            .user_repo
            .get_by_username(&username)
            .await
            .context("Failed to check username")?
            .is_some()
        {
            return Err(UserServiceError::UsernameExists(username));
        }

        if self
            .user_repo
            .get_by_email(&email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(UserServiceError::EmailExists(email));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = self
            .user_repo
            .create(&User::new(username, email, password_hash))
            .await
            .context("Failed to create user")?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Start a session for a user who already authenticated (registration
    /// logs the new account straight in). Sessions whose expiry passed
    /// without another visit are purged here, so the table does not grow
    /// without bound.
    pub async fn start_session(&self, user: &User) -> Result<Session, UserServiceError> {
        self.session_repo
            .delete_expired()
            .await
            .context("Failed to purge expired sessions")?;

        let session = Session::new(user.id, self.session_days);
        self.session_repo
            .create(&session)
            .await
            .context("Failed to store session")?;
        Ok(session)
    }

    /// Verify credentials and start a session.
    ///
    /// Unknown username and wrong password produce the same error.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_username(username.trim())
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::AuthenticationError)?;

        let matches =
            verify_password(password, &user.password_hash).context("Failed to verify password")?;
        if !matches {
            return Err(UserServiceError::AuthenticationError);
        }

        let session = self.start_session(&user).await?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(session)
    }

    /// Terminate a session. Unknown tokens are a no-op; logout always
    /// succeeds.
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Resolve a session token to its user, if the session exists and has
    /// not expired. Expired sessions are removed on sight.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let Some(session) = self
            .session_repo
            .get(token)
            .await
            .context("Failed to load session")?
        else {
            return Ok(None);
        };

        if session.is_expired() {
            self.session_repo
                .delete(token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to load session user")?;
        Ok(user)
    }
}
