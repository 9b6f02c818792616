//! Domain Layer
//!
//! Entities, the soft-delete/audit layer, and the repository trait.

pub mod entity;
pub mod repository;
pub mod soft_delete;

// Re-exports
pub use entity::{Address, AddressFields, AddressWrite, Patient, PatientDraft, PatientRecord};
pub use repository::PatientRepository;
pub use soft_delete::{Auditable, RecordFilter, SoftDeletable};
