//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and bearer-token middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{BearerAuthState, require_bearer};
pub use router::{auth_router, auth_router_generic};
