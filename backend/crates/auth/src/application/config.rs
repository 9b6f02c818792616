//! Application Configuration
//!
//! JWT configuration for token issuance and verification.

use chrono::Duration;

use crate::error::{AuthError, AuthResult};

/// Minimum symmetric key length: 256 bits.
pub const MIN_SECRET_BYTES: usize = 32;

/// JWT signing configuration.
///
/// Constructed once at startup; construction fails if the symmetric key
/// is shorter than 256 bits, so a weak key can never sign a token.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    token_lifetime: Duration,
}

impl JwtConfig {
    /// Create a config with the fixed 3-hour token lifetime.
    pub fn new(secret: String, issuer: String, audience: String) -> AuthResult<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::WeakSigningKey);
        }

        Ok(Self {
            secret: secret.into_bytes(),
            issuer,
            audience,
            token_lifetime: Duration::hours(3),
        })
    }

    /// Load from `JWT_SECRET`, `JWT_ISSUER`, and `JWT_AUDIENCE`.
    pub fn from_env() -> AuthResult<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Configuration("JWT_SECRET".to_string()))?;
        let issuer = std::env::var("JWT_ISSUER")
            .map_err(|_| AuthError::Configuration("JWT_ISSUER".to_string()))?;
        let audience = std::env::var("JWT_AUDIENCE")
            .map_err(|_| AuthError::Configuration("JWT_AUDIENCE".to_string()))?;

        Self::new(secret, issuer, audience)
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }
}
