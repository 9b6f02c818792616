//! Application Layer
//!
//! The patient service orchestrating CRUD and soft-delete bookkeeping.

pub mod service;

// Re-exports
pub use service::PatientService;
