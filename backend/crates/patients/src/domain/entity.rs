//! Patient and Address Entities

use chrono::{DateTime, NaiveDate, Utc};

/// Audit bookkeeping shared by every persisted entity.
///
/// Created fields are written once on insert and never overwritten;
/// modified fields are re-stamped on every later write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub last_modified_by: Option<String>,
}

/// Soft-delete bookkeeping.
///
/// A flagged row stays in the database and is excluded from default
/// reads; only the explicit hard-delete path removes it physically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deletion {
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

/// Patient record.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: Option<String>,
    /// Foreign key to the optional linked address
    pub address_id: Option<i32>,
    pub audit: Audit,
    pub deletion: Deletion,
}

/// Postal address, owned independently of the patients referencing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub audit: Audit,
    pub deletion: Deletion,
}

impl Address {
    /// Overwrite the postal fields in place, keeping id and bookkeeping.
    pub fn apply(&mut self, fields: &AddressFields) {
        self.street = fields.street.clone();
        self.city = fields.city.clone();
        self.postal_code = fields.postal_code.clone();
        self.country = fields.country.clone();
    }
}

/// Patient together with its linked address, as read paths return it.
#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub patient: Patient,
    pub address: Option<Address>,
}

/// Postal fields for a new address or an address overwrite.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFields {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Patient field set for create and update. Embedded address data is
/// never discarded: it either overwrites the linked address or creates
/// and links a new one.
#[derive(Debug, Clone)]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: Option<String>,
    pub address: Option<AddressFields>,
}

/// Address write accompanying a patient update. Committed in the same
/// transaction as the patient row.
#[derive(Debug, Clone)]
pub enum AddressWrite {
    /// Overwrite an existing linked address in place
    Update(Address),
    /// Insert a new address and link the patient to it
    Create(AddressFields),
}
