//! Repository Trait
//!
//! Interface for patient/address persistence. Implementations live in
//! the infrastructure layer; both stores (Postgres, in-memory) share
//! the same stamping and visibility semantics.

use kernel::Actor;

use crate::domain::entity::{AddressWrite, Deletion, Patient, PatientDraft, PatientRecord};
use crate::domain::soft_delete::RecordFilter;
use crate::error::PatientsResult;

/// Patient repository trait
#[trait_variant::make(PatientRepository: Send)]
pub trait LocalPatientRepository {
    /// All patients visible under `filter`, each with its linked address
    async fn list(&self, filter: RecordFilter) -> PatientsResult<Vec<PatientRecord>>;

    /// One patient with its linked address, or None
    async fn find_by_id(&self, id: i32, filter: RecordFilter)
    -> PatientsResult<Option<PatientRecord>>;

    /// Insert a patient, plus its embedded address when present, in one
    /// transaction. Returns the new patient id.
    async fn create(&self, draft: PatientDraft, actor: &Actor) -> PatientsResult<i32>;

    /// Persist patient fields and the accompanying address write in one
    /// transaction. Created audit fields are never touched.
    async fn update(
        &self,
        patient: &Patient,
        address: Option<AddressWrite>,
        actor: &Actor,
    ) -> PatientsResult<()>;

    /// Commit a soft-delete or restore. Returns false when no row with
    /// this id exists at all.
    async fn store_deletion(
        &self,
        id: i32,
        deletion: &Deletion,
        actor: &Actor,
    ) -> PatientsResult<bool>;

    /// Physically remove the row, regardless of its deletion flag.
    /// Returns false when no row matches. The linked address survives.
    async fn hard_delete(&self, id: i32) -> PatientsResult<bool>;
}
