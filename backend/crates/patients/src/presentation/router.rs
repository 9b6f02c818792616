//! Patients Router

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::application::service::PatientService;
use crate::domain::repository::PatientRepository;
use crate::infra::postgres::PgPatientStore;
use crate::presentation::handlers::{self, PatientsAppState};

/// Create the patients router with the PostgreSQL store
pub fn patients_router(store: PgPatientStore) -> Router {
    patients_router_generic(store)
}

/// Create a generic patients router for any store implementation
pub fn patients_router_generic<R>(store: R) -> Router
where
    R: PatientRepository + Send + Sync + 'static,
{
    let state = PatientsAppState {
        service: Arc::new(PatientService::new(Arc::new(store))),
    };

    // Literal segments take priority over captures, so /deleted and
    // /all never collide with /{id}.
    Router::new()
        .route("/", get(handlers::list::<R>).post(handlers::create::<R>))
        .route("/deleted", get(handlers::list_deleted::<R>))
        .route("/all", get(handlers::list_all::<R>))
        .route(
            "/{id}",
            get(handlers::get_by_id::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::soft_delete::<R>),
        )
        .route("/{id}/restore", post(handlers::restore::<R>))
        .route("/{id}/permanent", delete(handlers::hard_delete::<R>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::infra::memory::InMemoryPatientStore;

    const JOHN: &str =
        r#"{"firstName":"John","lastName":"Doe","dateOfBirth":"1985-06-15","gender":"Male"}"#;

    fn test_router() -> Router {
        patients_router_generic(InMemoryPatientStore::new())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_returns_201() {
        let router = test_router();
        let response = router
            .oneshot(json_request("POST", "/", JOHN))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_put_with_mismatched_body_id_returns_400() {
        let router = test_router();
        let created = router
            .clone()
            .oneshot(json_request("POST", "/", JOHN))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let body = r#"{"id":2,"firstName":"John","lastName":"Doe","dateOfBirth":"1985-06-15","gender":"Male"}"#;
        let response = router
            .oneshot(json_request("PUT", "/1", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_with_matching_body_id_returns_204() {
        let router = test_router();
        router
            .clone()
            .oneshot(json_request("POST", "/", JOHN))
            .await
            .unwrap();

        let body = r#"{"id":1,"firstName":"Johnny","lastName":"Doe","dateOfBirth":"1985-06-15","gender":"Male"}"#;
        let response = router
            .oneshot(json_request("PUT", "/1", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_missing_patient_maps_to_404() {
        let router = test_router();

        for (method, uri, body) in [
            ("GET", "/999", ""),
            ("PUT", "/999", JOHN),
            ("DELETE", "/999", ""),
            ("POST", "/999/restore", ""),
            ("DELETE", "/999/permanent", ""),
        ] {
            let response = router
                .clone()
                .oneshot(json_request(method, uri, body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_soft_deleted_patient_is_404_on_get_but_listed_under_deleted() {
        let router = test_router();
        router
            .clone()
            .oneshot(json_request("POST", "/", JOHN))
            .await
            .unwrap();

        let deleted = router
            .clone()
            .oneshot(json_request("DELETE", "/1", ""))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let get = router
            .clone()
            .oneshot(json_request("GET", "/1", ""))
            .await
            .unwrap();
        assert_eq!(get.status(), StatusCode::NOT_FOUND);

        let listing = router
            .oneshot(json_request("GET", "/deleted", ""))
            .await
            .unwrap();
        assert_eq!(listing.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(listing.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["isDeleted"], true);
    }
}
