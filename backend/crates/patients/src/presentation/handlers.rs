//! HTTP Handlers
//!
//! Thin translation between HTTP and the patient service. The verified
//! caller arrives as an `Extension<Actor>` from the bearer middleware;
//! writes without one are stamped as the system actor.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::Actor;

use crate::application::service::PatientService;
use crate::domain::repository::PatientRepository;
use crate::error::{PatientsError, PatientsResult};
use crate::presentation::dto::{PatientAdminDto, PatientDto, PatientPayload};

/// Shared state for patient handlers
pub struct PatientsAppState<R>
where
    R: PatientRepository + Send + Sync + 'static,
{
    pub service: Arc<PatientService<R>>,
}

// Manual impl; a derive would demand R: Clone for no reason.
impl<R> Clone for PatientsAppState<R>
where
    R: PatientRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

fn actor_or_system(actor: Option<Extension<Actor>>) -> Actor {
    actor.map(|Extension(a)| a).unwrap_or_else(Actor::system)
}

/// GET /api/patients
pub async fn list<R>(
    State(state): State<PatientsAppState<R>>,
) -> PatientsResult<Json<Vec<PatientDto>>>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let records = state.service.list().await?;
    Ok(Json(records.into_iter().map(PatientDto::from_record).collect()))
}

/// GET /api/patients/{id}
pub async fn get_by_id<R>(
    State(state): State<PatientsAppState<R>>,
    Path(id): Path<i32>,
) -> PatientsResult<Json<PatientDto>>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let record = state
        .service
        .get(id)
        .await?
        .ok_or(PatientsError::NotFound)?;
    Ok(Json(PatientDto::from_record(record)))
}

/// POST /api/patients
pub async fn create<R>(
    State(state): State<PatientsAppState<R>>,
    actor: Option<Extension<Actor>>,
    Json(payload): Json<PatientPayload>,
) -> PatientsResult<(StatusCode, Json<PatientDto>)>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let actor = actor_or_system(actor);
    let id = state.service.create(payload.into_draft(), &actor).await?;
    let record = state
        .service
        .get(id)
        .await?
        .ok_or(PatientsError::NotFound)?;
    Ok((StatusCode::CREATED, Json(PatientDto::from_record(record))))
}

/// PUT /api/patients/{id}
pub async fn update<R>(
    State(state): State<PatientsAppState<R>>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<i32>,
    Json(payload): Json<PatientPayload>,
) -> PatientsResult<StatusCode>
where
    R: PatientRepository + Send + Sync + 'static,
{
    if payload.id.is_some_and(|body_id| body_id != id) {
        return Err(PatientsError::IdMismatch);
    }

    let actor = actor_or_system(actor);
    if state.service.update(id, payload.into_draft(), &actor).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PatientsError::NotFound)
    }
}

/// DELETE /api/patients/{id}
pub async fn soft_delete<R>(
    State(state): State<PatientsAppState<R>>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<i32>,
) -> PatientsResult<StatusCode>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let actor = actor_or_system(actor);
    if state.service.soft_delete(id, &actor).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PatientsError::NotFound)
    }
}

/// POST /api/patients/{id}/restore
pub async fn restore<R>(
    State(state): State<PatientsAppState<R>>,
    actor: Option<Extension<Actor>>,
    Path(id): Path<i32>,
) -> PatientsResult<StatusCode>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let actor = actor_or_system(actor);
    if state.service.restore(id, &actor).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PatientsError::NotFound)
    }
}

/// DELETE /api/patients/{id}/permanent
pub async fn hard_delete<R>(
    State(state): State<PatientsAppState<R>>,
    Path(id): Path<i32>,
) -> PatientsResult<StatusCode>
where
    R: PatientRepository + Send + Sync + 'static,
{
    if state.service.hard_delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PatientsError::NotFound)
    }
}

/// GET /api/patients/deleted
pub async fn list_deleted<R>(
    State(state): State<PatientsAppState<R>>,
) -> PatientsResult<Json<Vec<PatientAdminDto>>>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let records = state.service.list_deleted().await?;
    Ok(Json(
        records.into_iter().map(PatientAdminDto::from_record).collect(),
    ))
}

/// GET /api/patients/all
pub async fn list_all<R>(
    State(state): State<PatientsAppState<R>>,
) -> PatientsResult<Json<Vec<PatientAdminDto>>>
where
    R: PatientRepository + Send + Sync + 'static,
{
    let records = state.service.list_including_deleted().await?;
    Ok(Json(
        records.into_iter().map(PatientAdminDto::from_record).collect(),
    ))
}
