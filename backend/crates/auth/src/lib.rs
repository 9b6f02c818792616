//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity and repository trait
//! - `application/` - Login use case and JWT configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Username + password login against the identity store
//! - Signed bearer tokens (HS256 JWT, 3-hour lifetime)
//! - Middleware that verifies tokens and injects the caller [`kernel::Actor`]
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (see the `platform` crate)
//! - Unknown user and wrong password return the same 401 response
//! - Signing keys shorter than 256 bits are rejected at configuration time

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

// Re-exports for convenience
pub use application::config::JwtConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
