//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{Address, AddressFields, PatientDraft, PatientRecord};

/// Embedded address in a patient payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Patient create/update payload. The optional `id` is only meaningful
/// on update, where it must match the path id.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    #[serde(default)]
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<AddressPayload>,
}

impl PatientPayload {
    pub fn into_draft(self) -> PatientDraft {
        PatientDraft {
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            phone_number: self.phone_number,
            address: self.address.map(|a| AddressFields {
                street: a.street,
                city: a.city,
                postal_code: a.postal_code,
                country: a.country,
            }),
        }
    }
}

/// Address response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl AddressDto {
    fn from_entity(address: Address) -> Self {
        Self {
            id: address.id,
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// Patient response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: Option<String>,
    pub address: Option<AddressDto>,
}

impl PatientDto {
    pub fn from_record(record: PatientRecord) -> Self {
        Self {
            id: record.patient.id,
            first_name: record.patient.first_name,
            last_name: record.patient.last_name,
            date_of_birth: record.patient.date_of_birth,
            gender: record.patient.gender,
            phone_number: record.patient.phone_number,
            address: record.address.map(AddressDto::from_entity),
        }
    }
}

/// Patient response for the admin listings, exposing the audit and
/// soft-delete bookkeeping the regular DTO hides.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAdminDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: Option<String>,
    pub address: Option<AddressDto>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl PatientAdminDto {
    pub fn from_record(record: PatientRecord) -> Self {
        Self {
            id: record.patient.id,
            first_name: record.patient.first_name,
            last_name: record.patient.last_name,
            date_of_birth: record.patient.date_of_birth,
            gender: record.patient.gender,
            phone_number: record.patient.phone_number,
            address: record.address.map(AddressDto::from_entity),
            created_at: record.patient.audit.created_at,
            created_by: record.patient.audit.created_by,
            last_modified_at: record.patient.audit.last_modified_at,
            last_modified_by: record.patient.audit.last_modified_by,
            is_deleted: record.patient.deletion.is_deleted,
            deleted_at: record.patient.deletion.deleted_at,
            deleted_by: record.patient.deletion.deleted_by,
        }
    }
}
