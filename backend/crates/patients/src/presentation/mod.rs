//! Presentation Layer
//!
//! HTTP handlers, DTOs, and the router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::PatientsAppState;
pub use router::{patients_router, patients_router_generic};
