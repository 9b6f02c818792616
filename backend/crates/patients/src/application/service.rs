//! Patient Service
//!
//! Orchestrates patient + address CRUD over the repository. Every
//! repository failure surfaces to the caller; no method converts an
//! error into an empty result.

use std::sync::Arc;

use chrono::Utc;
use kernel::Actor;

use crate::domain::entity::{AddressWrite, PatientDraft, PatientRecord};
use crate::domain::repository::PatientRepository;
use crate::domain::soft_delete::{RecordFilter, SoftDeletable};
use crate::error::PatientsResult;

/// Patient service
pub struct PatientService<R>
where
    R: PatientRepository,
{
    repo: Arc<R>,
}

impl<R> PatientService<R>
where
    R: PatientRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All non-deleted patients with their linked address.
    pub async fn list(&self) -> PatientsResult<Vec<PatientRecord>> {
        let patients = self.repo.list(RecordFilter::Active).await?;
        tracing::info!(count = patients.len(), "Retrieved patients");
        Ok(patients)
    }

    /// One non-deleted patient, or None.
    pub async fn get(&self, id: i32) -> PatientsResult<Option<PatientRecord>> {
        let record = self.repo.find_by_id(id, RecordFilter::Active).await?;
        if record.is_none() {
            tracing::warn!(patient_id = id, "Patient not found");
        }
        Ok(record)
    }

    /// Register a patient. Embedded address data is persisted first and
    /// linked by foreign key; both rows commit as one transaction.
    pub async fn create(&self, draft: PatientDraft, actor: &Actor) -> PatientsResult<i32> {
        let id = self.repo.create(draft, actor).await?;
        tracing::info!(patient_id = id, actor = %actor, "Patient created");
        Ok(id)
    }

    /// Overwrite a patient's fields. The linked address is updated in
    /// place when one exists; otherwise embedded address data creates
    /// and links a new row. Returns false when the patient is absent.
    pub async fn update(&self, id: i32, draft: PatientDraft, actor: &Actor) -> PatientsResult<bool> {
        let Some(record) = self.repo.find_by_id(id, RecordFilter::Active).await? else {
            tracing::warn!(patient_id = id, "Patient not found for update");
            return Ok(false);
        };

        let PatientRecord {
            mut patient,
            address,
        } = record;

        patient.first_name = draft.first_name;
        patient.last_name = draft.last_name;
        patient.date_of_birth = draft.date_of_birth;
        patient.gender = draft.gender;
        patient.phone_number = draft.phone_number;

        let address_write = match (draft.address, address) {
            (Some(fields), Some(mut existing)) => {
                existing.apply(&fields);
                Some(AddressWrite::Update(existing))
            }
            (Some(fields), None) => Some(AddressWrite::Create(fields)),
            (None, _) => None,
        };

        self.repo.update(&patient, address_write, actor).await?;
        tracing::info!(patient_id = id, actor = %actor, "Patient updated");
        Ok(true)
    }

    /// Flag a patient deleted. Locates the row bypassing the exclusion
    /// filter, so an already-flagged row is re-stamped rather than
    /// reported missing. Returns false when no row matches.
    pub async fn soft_delete(&self, id: i32, actor: &Actor) -> PatientsResult<bool> {
        let Some(mut record) = self.repo.find_by_id(id, RecordFilter::IncludeDeleted).await? else {
            tracing::warn!(patient_id = id, "Patient not found for deletion");
            return Ok(false);
        };

        record.patient.mark_deleted(actor.as_str(), Utc::now());
        let found = self
            .repo
            .store_deletion(id, record.patient.deletion(), actor)
            .await?;

        if found {
            tracing::info!(patient_id = id, actor = %actor, "Patient soft deleted");
        }
        Ok(found)
    }

    /// Clear a patient's deletion flag, timestamp, and actor. Returns
    /// false when no row matches.
    pub async fn restore(&self, id: i32, actor: &Actor) -> PatientsResult<bool> {
        let Some(mut record) = self.repo.find_by_id(id, RecordFilter::IncludeDeleted).await? else {
            tracing::warn!(patient_id = id, "Patient not found for restore");
            return Ok(false);
        };

        record.patient.clear_deleted();
        let found = self
            .repo
            .store_deletion(id, record.patient.deletion(), actor)
            .await?;

        if found {
            tracing::info!(patient_id = id, "Patient restored");
        }
        Ok(found)
    }

    /// Physically remove a patient row, flagged or not. Irreversible.
    pub async fn hard_delete(&self, id: i32) -> PatientsResult<bool> {
        let removed = self.repo.hard_delete(id).await?;
        if removed {
            tracing::warn!(patient_id = id, "Patient permanently deleted");
        } else {
            tracing::warn!(patient_id = id, "Patient not found for hard deletion");
        }
        Ok(removed)
    }

    /// Only soft-deleted patients, with their linked address.
    pub async fn list_deleted(&self) -> PatientsResult<Vec<PatientRecord>> {
        let patients = self.repo.list(RecordFilter::DeletedOnly).await?;
        tracing::info!(count = patients.len(), "Retrieved deleted patients");
        Ok(patients)
    }

    /// Every patient row, deleted or not.
    pub async fn list_including_deleted(&self) -> PatientsResult<Vec<PatientRecord>> {
        let patients = self.repo.list(RecordFilter::IncludeDeleted).await?;
        tracing::info!(count = patients.len(), "Retrieved patients including deleted");
        Ok(patients)
    }
}
