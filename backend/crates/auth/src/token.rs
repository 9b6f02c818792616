//! Bearer Token Issuance and Verification
//!
//! HS256 JWTs carrying the username (`sub`) and a unique token id
//! (`jti`), with issuer/audience/lifetime taken from [`JwtConfig`].
//! The gateway and the backend verify the same scheme independently.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::JwtConfig;
use crate::error::{AuthError, AuthResult};

/// Registered claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated caller
    pub sub: String,
    /// Unique token id (UUID v4)
    pub jti: String,
    pub iss: String,
    pub aud: String,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign a token for `username` using the configured symmetric key.
pub fn issue(config: &JwtConfig, username: &str) -> AuthResult<IssuedToken> {
    let issued_at = Utc::now();
    let expires_at = issued_at + config.token_lifetime();

    let claims = Claims {
        sub: username.to_string(),
        jti: Uuid::new_v4().to_string(),
        iss: config.issuer().to_string(),
        aud: config.audience().to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret()),
    )
    .map_err(AuthError::TokenCreation)?;

    // Report the second-granular expiry actually encoded in the claim
    let expires_at = Utc
        .timestamp_opt(claims.exp, 0)
        .single()
        .unwrap_or(expires_at);

    Ok(IssuedToken { token, expires_at })
}

/// Verify signature, expiry, issuer, and audience; return the claims.
pub fn verify(config: &JwtConfig, token: &str) -> AuthResult<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer()]);
    validation.set_audience(&[config.audience()]);

    decode::<Claims>(token, &DecodingKey::from_secret(config.secret()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthError::InvalidToken
        })
}
