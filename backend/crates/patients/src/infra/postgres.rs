//! PostgreSQL Store Implementation
//!
//! Implements the repository trait against Postgres. The address table
//! is only ever written inside the same transaction as the patient row
//! it accompanies, and audit stamping happens here with a single
//! timestamp per unit of work.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::Actor;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entity::{
    Address, AddressFields, AddressWrite, Audit, Deletion, Patient, PatientDraft, PatientRecord,
};
use crate::domain::repository::PatientRepository;
use crate::domain::soft_delete::RecordFilter;
use crate::error::PatientsResult;

/// PostgreSQL-backed patient/address store
#[derive(Clone)]
pub struct PgPatientStore {
    pool: PgPool,
}

impl PgPatientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    p.id, p.first_name, p.last_name, p.date_of_birth, p.gender,
    p.phone_number, p.address_id,
    p.created_at, p.created_by, p.last_modified_at, p.last_modified_by,
    p.is_deleted, p.deleted_at, p.deleted_by,
    a.id AS a_id, a.street AS a_street, a.city AS a_city,
    a.postal_code AS a_postal_code, a.country AS a_country,
    a.created_at AS a_created_at, a.created_by AS a_created_by,
    a.last_modified_at AS a_last_modified_at,
    a.last_modified_by AS a_last_modified_by,
    a.is_deleted AS a_is_deleted, a.deleted_at AS a_deleted_at,
    a.deleted_by AS a_deleted_by
"#;

/// SQL predicates for a visibility filter: the patient WHERE clause and
/// the extra join condition. With `Active` the join also hides a
/// soft-deleted address, matching the behavior of the default read path.
fn filter_sql(filter: RecordFilter) -> (&'static str, &'static str) {
    match filter {
        RecordFilter::Active => ("p.is_deleted = FALSE", "AND a.is_deleted = FALSE"),
        RecordFilter::IncludeDeleted => ("TRUE", ""),
        RecordFilter::DeletedOnly => ("p.is_deleted = TRUE", ""),
    }
}

fn select_sql(filter: RecordFilter, by_id: bool) -> String {
    let (visibility, join_filter) = filter_sql(filter);
    let id_clause = if by_id { "AND p.id = $1" } else { "" };
    format!(
        "SELECT {SELECT_COLUMNS} \
         FROM patients p \
         LEFT JOIN addresses a ON a.id = p.address_id {join_filter} \
         WHERE {visibility} {id_clause} \
         ORDER BY p.id"
    )
}

impl PatientRepository for PgPatientStore {
    async fn list(&self, filter: RecordFilter) -> PatientsResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRow>(&select_sql(filter, false))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PatientRow::into_record).collect())
    }

    async fn find_by_id(
        &self,
        id: i32,
        filter: RecordFilter,
    ) -> PatientsResult<Option<PatientRecord>> {
        let row = sqlx::query_as::<_, PatientRow>(&select_sql(filter, true))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PatientRow::into_record))
    }

    async fn create(&self, draft: PatientDraft, actor: &Actor) -> PatientsResult<i32> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let address_id = match &draft.address {
            Some(fields) => Some(insert_address(&mut tx, fields, actor, now).await?),
            None => None,
        };

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO patients (
                first_name, last_name, date_of_birth, gender, phone_number,
                address_id, created_at, created_by, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
            RETURNING id
            "#,
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(draft.date_of_birth)
        .bind(&draft.gender)
        .bind(draft.phone_number.as_deref())
        .bind(address_id)
        .bind(now)
        .bind(actor.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(
        &self,
        patient: &Patient,
        address: Option<AddressWrite>,
        actor: &Actor,
    ) -> PatientsResult<()> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let address_id = match address {
            Some(AddressWrite::Update(existing)) => {
                update_address(&mut tx, &existing, actor, now).await?;
                Some(existing.id)
            }
            Some(AddressWrite::Create(fields)) => {
                Some(insert_address(&mut tx, &fields, actor, now).await?)
            }
            None => patient.address_id,
        };

        sqlx::query(
            r#"
            UPDATE patients SET
                first_name = $1,
                last_name = $2,
                date_of_birth = $3,
                gender = $4,
                phone_number = $5,
                address_id = $6,
                last_modified_at = $7,
                last_modified_by = $8
            WHERE id = $9
            "#,
        )
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(&patient.gender)
        .bind(patient.phone_number.as_deref())
        .bind(address_id)
        .bind(now)
        .bind(actor.as_str())
        .bind(patient.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn store_deletion(
        &self,
        id: i32,
        deletion: &Deletion,
        actor: &Actor,
    ) -> PatientsResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE patients SET
                is_deleted = $1,
                deleted_at = $2,
                deleted_by = $3,
                last_modified_at = $4,
                last_modified_by = $5
            WHERE id = $6
            "#,
        )
        .bind(deletion.is_deleted)
        .bind(deletion.deleted_at)
        .bind(deletion.deleted_by.as_deref())
        .bind(Utc::now())
        .bind(actor.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn hard_delete(&self, id: i32) -> PatientsResult<bool> {
        let affected = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Address writes (transaction-scoped)
// ============================================================================

async fn insert_address(
    tx: &mut Transaction<'_, Postgres>,
    fields: &AddressFields,
    actor: &Actor,
    now: DateTime<Utc>,
) -> PatientsResult<i32> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO addresses (
            street, city, postal_code, country, created_at, created_by, is_deleted
        ) VALUES ($1, $2, $3, $4, $5, $6, FALSE)
        RETURNING id
        "#,
    )
    .bind(&fields.street)
    .bind(&fields.city)
    .bind(&fields.postal_code)
    .bind(&fields.country)
    .bind(now)
    .bind(actor.as_str())
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

async fn update_address(
    tx: &mut Transaction<'_, Postgres>,
    address: &Address,
    actor: &Actor,
    now: DateTime<Utc>,
) -> PatientsResult<()> {
    sqlx::query(
        r#"
        UPDATE addresses SET
            street = $1,
            city = $2,
            postal_code = $3,
            country = $4,
            last_modified_at = $5,
            last_modified_by = $6
        WHERE id = $7
        "#,
    )
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.postal_code)
    .bind(&address.country)
    .bind(now)
    .bind(actor.as_str())
    .bind(address.id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct PatientRow {
    id: i32,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: String,
    phone_number: Option<String>,
    address_id: Option<i32>,
    created_at: DateTime<Utc>,
    created_by: Option<String>,
    last_modified_at: Option<DateTime<Utc>>,
    last_modified_by: Option<String>,
    is_deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
    a_id: Option<i32>,
    a_street: Option<String>,
    a_city: Option<String>,
    a_postal_code: Option<String>,
    a_country: Option<String>,
    a_created_at: Option<DateTime<Utc>>,
    a_created_by: Option<String>,
    a_last_modified_at: Option<DateTime<Utc>>,
    a_last_modified_by: Option<String>,
    a_is_deleted: Option<bool>,
    a_deleted_at: Option<DateTime<Utc>>,
    a_deleted_by: Option<String>,
}

impl PatientRow {
    fn into_record(self) -> PatientRecord {
        let address = self.a_id.map(|id| Address {
            id,
            street: self.a_street.unwrap_or_default(),
            city: self.a_city.unwrap_or_default(),
            postal_code: self.a_postal_code.unwrap_or_default(),
            country: self.a_country.unwrap_or_default(),
            audit: Audit {
                created_at: self.a_created_at.unwrap_or_default(),
                created_by: self.a_created_by,
                last_modified_at: self.a_last_modified_at,
                last_modified_by: self.a_last_modified_by,
            },
            deletion: Deletion {
                is_deleted: self.a_is_deleted.unwrap_or(false),
                deleted_at: self.a_deleted_at,
                deleted_by: self.a_deleted_by,
            },
        });

        PatientRecord {
            patient: Patient {
                id: self.id,
                first_name: self.first_name,
                last_name: self.last_name,
                date_of_birth: self.date_of_birth,
                gender: self.gender,
                phone_number: self.phone_number,
                address_id: self.address_id,
                audit: Audit {
                    created_at: self.created_at,
                    created_by: self.created_by,
                    last_modified_at: self.last_modified_at,
                    last_modified_by: self.last_modified_by,
                },
                deletion: Deletion {
                    is_deleted: self.is_deleted,
                    deleted_at: self.deleted_at,
                    deleted_by: self.deleted_by,
                },
            },
            address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_variants() {
        let (active, join) = filter_sql(RecordFilter::Active);
        assert_eq!(active, "p.is_deleted = FALSE");
        assert!(join.contains("a.is_deleted = FALSE"));

        let (all, join) = filter_sql(RecordFilter::IncludeDeleted);
        assert_eq!(all, "TRUE");
        assert!(join.is_empty());

        let (deleted, _) = filter_sql(RecordFilter::DeletedOnly);
        assert_eq!(deleted, "p.is_deleted = TRUE");
    }

    #[test]
    fn test_select_sql_by_id_binds_parameter() {
        let sql = select_sql(RecordFilter::Active, true);
        assert!(sql.contains("AND p.id = $1"));

        let sql = select_sql(RecordFilter::DeletedOnly, false);
        assert!(!sql.contains("$1"));
    }
}
