//! Soft-Delete and Audit Layer
//!
//! Cross-cutting primitives over any entity carrying [`Deletion`] and
//! [`Audit`] bookkeeping. Mutations here are pure in-memory changes;
//! the caller commits them through the repository, together with the
//! audit stamping for that unit of work.

use chrono::{DateTime, Utc};

use crate::domain::entity::{Address, Audit, Deletion, Patient};

/// Row visibility for read paths.
///
/// Replaces the source system's implicit global query filter with an
/// explicit parameter at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    /// Only rows without the soft-delete flag (the default read path)
    Active,
    /// All rows, bypassing the exclusion filter
    IncludeDeleted,
    /// Only rows with the soft-delete flag set
    DeletedOnly,
}

impl RecordFilter {
    /// Whether a row with this deletion state is visible under the filter.
    pub fn matches(&self, deletion: &Deletion) -> bool {
        match self {
            RecordFilter::Active => !deletion.is_deleted,
            RecordFilter::IncludeDeleted => true,
            RecordFilter::DeletedOnly => deletion.is_deleted,
        }
    }
}

/// Entities that can be flagged deleted without leaving the store.
pub trait SoftDeletable {
    fn deletion(&self) -> &Deletion;
    fn deletion_mut(&mut self) -> &mut Deletion;

    fn is_deleted(&self) -> bool {
        self.deletion().is_deleted
    }

    /// Flag the entity deleted by `actor` at `at`. In-memory only; the
    /// caller commits.
    fn mark_deleted(&mut self, actor: &str, at: DateTime<Utc>) {
        let deletion = self.deletion_mut();
        deletion.is_deleted = true;
        deletion.deleted_at = Some(at);
        deletion.deleted_by = Some(actor.to_string());
    }

    /// Clear the deletion flag, timestamp, and actor. In-memory only.
    fn clear_deleted(&mut self) {
        let deletion = self.deletion_mut();
        deletion.is_deleted = false;
        deletion.deleted_at = None;
        deletion.deleted_by = None;
    }
}

/// Entities whose writes are audit-stamped.
pub trait Auditable {
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;

    /// Stamp creation bookkeeping. Called exactly once, on insert.
    fn stamp_created(&mut self, actor: &str, at: DateTime<Utc>) {
        let audit = self.audit_mut();
        audit.created_at = at;
        audit.created_by = Some(actor.to_string());
    }

    /// Stamp modification bookkeeping, leaving created fields untouched.
    fn stamp_modified(&mut self, actor: &str, at: DateTime<Utc>) {
        let audit = self.audit_mut();
        audit.last_modified_at = Some(at);
        audit.last_modified_by = Some(actor.to_string());
    }
}

impl SoftDeletable for Patient {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}

impl Auditable for Patient {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

impl SoftDeletable for Address {
    fn deletion(&self) -> &Deletion {
        &self.deletion
    }

    fn deletion_mut(&mut self) -> &mut Deletion {
        &mut self.deletion
    }
}

impl Auditable for Address {
    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_patient() -> Patient {
        Patient {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            gender: "Male".to_string(),
            phone_number: None,
            address_id: None,
            audit: Audit::default(),
            deletion: Deletion::default(),
        }
    }

    #[test]
    fn test_mark_and_clear_deleted() {
        let mut patient = sample_patient();
        let at = Utc::now();

        patient.mark_deleted("tester", at);
        assert!(patient.is_deleted());
        assert_eq!(patient.deletion.deleted_at, Some(at));
        assert_eq!(patient.deletion.deleted_by.as_deref(), Some("tester"));

        patient.clear_deleted();
        assert!(!patient.is_deleted());
        assert_eq!(patient.deletion.deleted_at, None);
        assert_eq!(patient.deletion.deleted_by, None);
    }

    #[test]
    fn test_filter_visibility() {
        let active = Deletion::default();
        let deleted = Deletion {
            is_deleted: true,
            deleted_at: Some(Utc::now()),
            deleted_by: Some("tester".to_string()),
        };

        assert!(RecordFilter::Active.matches(&active));
        assert!(!RecordFilter::Active.matches(&deleted));

        assert!(RecordFilter::IncludeDeleted.matches(&active));
        assert!(RecordFilter::IncludeDeleted.matches(&deleted));

        assert!(!RecordFilter::DeletedOnly.matches(&active));
        assert!(RecordFilter::DeletedOnly.matches(&deleted));
    }

    #[test]
    fn test_modified_stamp_leaves_created_alone() {
        let mut patient = sample_patient();
        let created = Utc::now();
        patient.stamp_created("System", created);

        let later = created + chrono::Duration::minutes(5);
        patient.stamp_modified("alice", later);

        assert_eq!(patient.audit.created_at, created);
        assert_eq!(patient.audit.created_by.as_deref(), Some("System"));
        assert_eq!(patient.audit.last_modified_at, Some(later));
        assert_eq!(patient.audit.last_modified_by.as_deref(), Some("alice"));
    }
}
