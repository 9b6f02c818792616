//! Patients Error Types
//!
//! Patient-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. All repository failures surface
//! here and travel up to the controller boundary; service methods never
//! swallow them into empty results.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Patients-specific result type alias
pub type PatientsResult<T> = Result<T, PatientsError>;

/// Patients-specific error variants
#[derive(Debug, Error)]
pub enum PatientsError {
    /// Patient absent, or soft-deleted on a path that excludes deleted rows
    #[error("Patient not found")]
    NotFound,

    /// Path id and body id disagree
    #[error("Patient id in path does not match request body")]
    IdMismatch,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl PatientsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PatientsError::NotFound => StatusCode::NOT_FOUND,
            PatientsError::IdMismatch => StatusCode::BAD_REQUEST,
            PatientsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PatientsError::NotFound => ErrorKind::NotFound,
            PatientsError::IdMismatch => ErrorKind::BadRequest,
            PatientsError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError. Storage failures get a generic client
    /// message; the detail stays in the log.
    pub fn to_app_error(&self) -> AppError {
        match self {
            PatientsError::Database(_) => {
                AppError::new(self.kind(), "An unexpected error occurred")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PatientsError::Database(e) => {
                tracing::error!(error = %e, "Patients database error");
            }
            _ => {
                tracing::debug!(error = %self, "Patients error");
            }
        }
    }
}

impl IntoResponse for PatientsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
