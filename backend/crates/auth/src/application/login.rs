//! Login Use Case
//!
//! Validates credentials against the identity store and mints a signed
//! bearer token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::JwtConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::token;

/// Login input
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed bearer token
    pub token: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    repo: Arc<U>,
    config: Arc<JwtConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(repo: Arc<U>, config: Arc<JwtConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.username.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self.repo.find_by_username(&input.username).await?;

        // Unknown user and wrong password take the same exit
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let stored = HashedPassword::from_phc_string(&user.password_hash)
            .map_err(|_| AuthError::Internal("Stored password hash is malformed".to_string()))?;

        let candidate = ClearTextPassword::new_unchecked(input.password);
        if !stored.verify(&candidate) {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = token::issue(&self.config, &user.username)?;

        tracing::info!(username = %user.username, "User authenticated, token issued");

        Ok(LoginOutput {
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
