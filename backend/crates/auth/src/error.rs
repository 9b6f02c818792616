//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password missing from the request
    #[error("Username and password are required")]
    MissingCredentials,

    /// Unknown user or wrong password. One variant for both, so the
    /// response never reveals which check failed.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No bearer token on a protected route
    #[error("Missing bearer token")]
    MissingToken,

    /// Token failed signature, expiry, issuer, or audience checks
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Symmetric signing key shorter than 256 bits
    #[error("JWT signing key must be at least 256 bits")]
    WeakSigningKey,

    /// Missing or malformed configuration value
    #[error("Missing configuration: {0}")]
    Configuration(String),

    /// Signing a token failed
    #[error("Token creation failed")]
    TokenCreation(#[source] jsonwebtoken::errors::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::WeakSigningKey
            | AuthError::Configuration(_)
            | AuthError::TokenCreation(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::WeakSigningKey
            | AuthError::Configuration(_)
            | AuthError::TokenCreation(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Server errors get a generic client message;
    /// the detail stays in the log.
    pub fn to_app_error(&self) -> AppError {
        if self.kind().is_server_error() {
            AppError::new(self.kind(), "An unexpected error occurred")
        } else {
            AppError::new(self.kind(), self.to_string())
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::TokenCreation(e) => {
                tracing::error!(error = %e, "Token creation failed");
            }
            AuthError::WeakSigningKey | AuthError::Configuration(_) => {
                tracing::error!(error = %self, "Auth configuration error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_share_status() {
        // Unknown user and wrong password must be indistinguishable.
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AuthError::Internal("pool exploded at 03:14".to_string());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "An unexpected error occurred");
    }

    #[test]
    fn test_missing_credentials_is_bad_request() {
        assert_eq!(
            AuthError::MissingCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
