//! In-Memory Store Implementation
//!
//! Vec-backed store for service-level tests. Mirrors the Postgres
//! store's semantics: audit stamping with one timestamp per unit of
//! work, address writes riding the patient write, and the same
//! visibility rules including the active-only address join.

use std::sync::Mutex;

use chrono::Utc;
use kernel::Actor;

use crate::domain::entity::{
    Address, AddressWrite, Audit, Deletion, Patient, PatientDraft, PatientRecord,
};
use crate::domain::repository::PatientRepository;
use crate::domain::soft_delete::{Auditable, RecordFilter, SoftDeletable};
use crate::error::PatientsResult;

#[derive(Default)]
struct Tables {
    patients: Vec<Patient>,
    addresses: Vec<Address>,
}

/// In-memory patient/address store
#[derive(Default)]
pub struct InMemoryPatientStore {
    tables: Mutex<Tables>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one patient row regardless of visibility, for
    /// asserting on audit and deletion bookkeeping in tests.
    pub fn raw_patient(&self, id: i32) -> Option<Patient> {
        let tables = self.tables.lock().unwrap();
        tables.patients.iter().find(|p| p.id == id).cloned()
    }

    /// Snapshot of one address row regardless of visibility.
    pub fn raw_address(&self, id: i32) -> Option<Address> {
        let tables = self.tables.lock().unwrap();
        tables.addresses.iter().find(|a| a.id == id).cloned()
    }

    /// Number of address rows, deleted ones included.
    pub fn address_count(&self) -> usize {
        let tables = self.tables.lock().unwrap();
        tables.addresses.len()
    }

    fn record(tables: &Tables, patient: &Patient, filter: RecordFilter) -> PatientRecord {
        let address = patient.address_id.and_then(|id| {
            tables
                .addresses
                .iter()
                .find(|a| a.id == id)
                .filter(|a| filter != RecordFilter::Active || !a.is_deleted())
                .cloned()
        });

        PatientRecord {
            patient: patient.clone(),
            address,
        }
    }
}

fn next_id<T>(rows: &[T], id_of: impl Fn(&T) -> i32) -> i32 {
    rows.iter().map(id_of).max().unwrap_or(0) + 1
}

impl PatientRepository for InMemoryPatientStore {
    async fn list(&self, filter: RecordFilter) -> PatientsResult<Vec<PatientRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .patients
            .iter()
            .filter(|p| filter.matches(&p.deletion))
            .map(|p| Self::record(&tables, p, filter))
            .collect())
    }

    async fn find_by_id(
        &self,
        id: i32,
        filter: RecordFilter,
    ) -> PatientsResult<Option<PatientRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .patients
            .iter()
            .find(|p| p.id == id && filter.matches(&p.deletion))
            .map(|p| Self::record(&tables, p, filter)))
    }

    async fn create(&self, draft: PatientDraft, actor: &Actor) -> PatientsResult<i32> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();

        let address_id = draft.address.map(|fields| {
            let id = next_id(&tables.addresses, |a| a.id);
            let mut address = Address {
                id,
                street: fields.street,
                city: fields.city,
                postal_code: fields.postal_code,
                country: fields.country,
                audit: Audit::default(),
                deletion: Deletion::default(),
            };
            address.stamp_created(actor.as_str(), now);
            tables.addresses.push(address);
            id
        });

        let id = next_id(&tables.patients, |p| p.id);
        let mut patient = Patient {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            date_of_birth: draft.date_of_birth,
            gender: draft.gender,
            phone_number: draft.phone_number,
            address_id,
            audit: Audit::default(),
            deletion: Deletion::default(),
        };
        patient.stamp_created(actor.as_str(), now);
        tables.patients.push(patient);

        Ok(id)
    }

    async fn update(
        &self,
        patient: &Patient,
        address: Option<AddressWrite>,
        actor: &Actor,
    ) -> PatientsResult<()> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();

        let address_id = match address {
            Some(AddressWrite::Update(updated)) => {
                let id = updated.id;
                if let Some(stored) = tables.addresses.iter_mut().find(|a| a.id == id) {
                    stored.street = updated.street;
                    stored.city = updated.city;
                    stored.postal_code = updated.postal_code;
                    stored.country = updated.country;
                    stored.stamp_modified(actor.as_str(), now);
                }
                Some(id)
            }
            Some(AddressWrite::Create(fields)) => {
                let id = next_id(&tables.addresses, |a| a.id);
                let mut created = Address {
                    id,
                    street: fields.street,
                    city: fields.city,
                    postal_code: fields.postal_code,
                    country: fields.country,
                    audit: Audit::default(),
                    deletion: Deletion::default(),
                };
                created.stamp_created(actor.as_str(), now);
                tables.addresses.push(created);
                Some(id)
            }
            None => patient.address_id,
        };

        if let Some(stored) = tables.patients.iter_mut().find(|p| p.id == patient.id) {
            stored.first_name = patient.first_name.clone();
            stored.last_name = patient.last_name.clone();
            stored.date_of_birth = patient.date_of_birth;
            stored.gender = patient.gender.clone();
            stored.phone_number = patient.phone_number.clone();
            stored.address_id = address_id;
            stored.stamp_modified(actor.as_str(), now);
        }

        Ok(())
    }

    async fn store_deletion(
        &self,
        id: i32,
        deletion: &Deletion,
        actor: &Actor,
    ) -> PatientsResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let Some(stored) = tables.patients.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };

        stored.deletion = deletion.clone();
        stored.stamp_modified(actor.as_str(), Utc::now());
        Ok(true)
    }

    async fn hard_delete(&self, id: i32) -> PatientsResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.patients.len();
        tables.patients.retain(|p| p.id != id);
        Ok(tables.patients.len() < before)
    }
}
