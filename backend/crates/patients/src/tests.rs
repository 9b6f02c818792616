//! Service-level tests against the in-memory store.

use std::sync::Arc;

use chrono::NaiveDate;
use kernel::Actor;

use crate::application::service::PatientService;
use crate::domain::entity::{AddressFields, PatientDraft};
use crate::infra::memory::InMemoryPatientStore;

fn service() -> (Arc<InMemoryPatientStore>, PatientService<InMemoryPatientStore>) {
    let store = Arc::new(InMemoryPatientStore::new());
    (store.clone(), PatientService::new(store))
}

fn draft(first: &str, last: &str, address: Option<AddressFields>) -> PatientDraft {
    PatientDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
        gender: "Male".to_string(),
        phone_number: Some("555-123-4567".to_string()),
        address,
    }
}

fn home_address() -> AddressFields {
    AddressFields {
        street: "123 Main St".to_string(),
        city: "Springfield".to_string(),
        postal_code: "12345".to_string(),
        country: "USA".to_string(),
    }
}

#[tokio::test]
async fn test_soft_delete_hides_patient_from_default_listing() {
    let (_, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("John", "Doe", None), &actor).await.unwrap();
    assert!(service.soft_delete(id, &actor).await.unwrap());

    assert!(service.list().await.unwrap().is_empty());

    let all = service.list_including_deleted().await.unwrap();
    assert_eq!(all.len(), 1);
    let deletion = &all[0].patient.deletion;
    assert!(deletion.is_deleted);
    assert!(deletion.deleted_at.is_some());
    assert_eq!(deletion.deleted_by.as_deref(), Some("tester"));
}

#[tokio::test]
async fn test_deleted_listing_returns_deleted_by_actor() {
    let (_, service) = service();
    let actor = Actor::named("tester");

    let john = service.create(draft("John", "Doe", Some(home_address())), &actor).await.unwrap();
    let jane = service.create(draft("Jane", "Smith", None), &actor).await.unwrap();

    assert!(service.soft_delete(john, &actor).await.unwrap());

    let deleted = service.list_deleted().await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].patient.id, john);
    assert_eq!(deleted[0].patient.first_name, "John");
    assert_eq!(deleted[0].patient.deletion.deleted_by.as_deref(), Some("tester"));

    // The other patient stays in the default listing.
    let active = service.list().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].patient.id, jane);
}

#[tokio::test]
async fn test_restore_clears_deletion_bookkeeping() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("John", "Doe", None), &actor).await.unwrap();
    assert!(service.soft_delete(id, &actor).await.unwrap());
    assert!(service.restore(id, &actor).await.unwrap());

    let patient = store.raw_patient(id).unwrap();
    assert!(!patient.deletion.is_deleted);
    assert!(patient.deletion.deleted_at.is_none());
    assert!(patient.deletion.deleted_by.is_none());

    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_rows_report_false_without_error() {
    let (_, service) = service();
    let actor = Actor::named("tester");

    assert!(!service.hard_delete(999).await.unwrap());
    assert!(!service.soft_delete(999, &actor).await.unwrap());
    assert!(!service.restore(999, &actor).await.unwrap());
    assert!(!service.update(999, draft("No", "One", None), &actor).await.unwrap());
}

#[tokio::test]
async fn test_create_with_address_links_exactly_one_row() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("John", "Doe", Some(home_address())), &actor).await.unwrap();

    assert_eq!(store.address_count(), 1);
    let record = service.get(id).await.unwrap().unwrap();
    let address = record.address.unwrap();
    assert_eq!(record.patient.address_id, Some(address.id));
    assert_eq!(address.street, "123 Main St");
}

#[tokio::test]
async fn test_create_without_address_adds_no_address_rows() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    service.create(draft("Jane", "Smith", None), &actor).await.unwrap();
    assert_eq!(store.address_count(), 0);
}

#[tokio::test]
async fn test_update_mutates_linked_address_in_place() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("John", "Doe", Some(home_address())), &actor).await.unwrap();
    let original_address_id = store.raw_patient(id).unwrap().address_id.unwrap();

    let mut updated = draft("John", "Doe", Some(home_address()));
    updated.address.as_mut().unwrap().street = "456 Oak Ave".to_string();
    assert!(service.update(id, updated, &actor).await.unwrap());

    // Same row, new fields, no extra address row.
    assert_eq!(store.address_count(), 1);
    let address = store.raw_address(original_address_id).unwrap();
    assert_eq!(address.street, "456 Oak Ave");
    assert_eq!(store.raw_patient(id).unwrap().address_id, Some(original_address_id));
}

#[tokio::test]
async fn test_update_creates_address_when_none_linked() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("Jane", "Smith", None), &actor).await.unwrap();
    assert_eq!(store.address_count(), 0);

    assert!(service
        .update(id, draft("Jane", "Smith", Some(home_address())), &actor)
        .await
        .unwrap());

    assert_eq!(store.address_count(), 1);
    assert!(store.raw_patient(id).unwrap().address_id.is_some());
}

#[tokio::test]
async fn test_audit_stamping_preserves_created_fields_on_update() {
    let (store, service) = service();
    let creator = Actor::named("alice");
    let editor = Actor::named("bob");

    let id = service.create(draft("John", "Doe", None), &creator).await.unwrap();
    let created = store.raw_patient(id).unwrap().audit;
    assert_eq!(created.created_by.as_deref(), Some("alice"));
    assert!(created.last_modified_at.is_none());

    assert!(service.update(id, draft("John", "Doe", None), &editor).await.unwrap());

    let audit = store.raw_patient(id).unwrap().audit;
    assert_eq!(audit.created_by.as_deref(), Some("alice"));
    assert_eq!(audit.created_at, created.created_at);
    assert_eq!(audit.last_modified_by.as_deref(), Some("bob"));
    assert!(audit.last_modified_at.is_some());
}

#[tokio::test]
async fn test_hard_delete_removes_row_but_keeps_address() {
    let (store, service) = service();
    let actor = Actor::named("tester");

    let id = service.create(draft("John", "Doe", Some(home_address())), &actor).await.unwrap();
    assert!(service.hard_delete(id).await.unwrap());

    assert!(store.raw_patient(id).is_none());
    assert!(service.list_including_deleted().await.unwrap().is_empty());
    assert_eq!(store.address_count(), 1);
}

#[tokio::test]
async fn test_soft_delete_of_already_deleted_patient_restamps() {
    let (store, service) = service();

    let id = service
        .create(draft("John", "Doe", None), &Actor::named("alice"))
        .await
        .unwrap();
    assert!(service.soft_delete(id, &Actor::named("alice")).await.unwrap());
    assert!(service.soft_delete(id, &Actor::named("bob")).await.unwrap());

    let deletion = store.raw_patient(id).unwrap().deletion;
    assert!(deletion.is_deleted);
    assert_eq!(deletion.deleted_by.as_deref(), Some("bob"));
}
