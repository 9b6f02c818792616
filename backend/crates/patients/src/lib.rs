//! Patients Backend Module
//!
//! Soft-delete-aware CRUD over patient records and their addresses.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, soft-delete/audit layer, repository trait
//! - `application/` - The patient service
//! - `infra/` - Postgres and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Semantics
//! - Reads exclude soft-deleted rows unless a [`domain::RecordFilter`]
//!   explicitly asks for them
//! - Every committed write stamps audit fields with the caller identity
//! - Create/update with embedded address data commits as one transaction
//! - Rows only leave the database through the explicit hard-delete path

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::service::PatientService;
pub use domain::{Address, Patient, PatientRecord, RecordFilter};
pub use error::{PatientsError, PatientsResult};
pub use infra::{InMemoryPatientStore, PgPatientStore};
pub use presentation::router::patients_router;
