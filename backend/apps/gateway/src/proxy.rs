//! Reverse-Proxy Core
//!
//! Static route table and the forwarding handler. Each inbound request
//! is matched by path prefix, optionally checked for a valid bearer
//! token, and relayed to the backend with method, path, query, headers,
//! and body intact. Upstream status and body pass back unchanged.

use std::sync::Arc;

use auth::{JwtConfig, token};
use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Request bodies larger than this are rejected before forwarding.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Whether a route requires a verified bearer token before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAuth {
    Public,
    Bearer,
}

/// One entry in the route table: path prefix, upstream base URL, and
/// the auth requirement enforced before forwarding.
#[derive(Debug, Clone)]
pub struct Route {
    pub prefix: &'static str,
    pub upstream: String,
    pub auth: RouteAuth,
}

/// Build the route table. Login passes through untouched; everything
/// under the patient prefix needs a valid token before it reaches the
/// backend. Both prefixes currently point at the same API server.
pub fn route_table(backend_url: &str) -> Vec<Route> {
    vec![
        Route {
            prefix: "/api/auth",
            upstream: backend_url.to_string(),
            auth: RouteAuth::Public,
        },
        Route {
            prefix: "/api/patients",
            upstream: backend_url.to_string(),
            auth: RouteAuth::Bearer,
        },
    ]
}

/// Match a request path against the route table. A prefix matches the
/// exact path or a longer path at a segment boundary, so `/api/auth`
/// matches `/api/auth/login` but not `/api/authx`.
pub fn match_route<'a>(routes: &'a [Route], path: &str) -> Option<&'a Route> {
    routes.iter().find(|route| {
        path.strip_prefix(route.prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Shared proxy state
#[derive(Clone)]
pub struct GatewayState {
    pub client: reqwest::Client,
    pub routes: Arc<Vec<Route>>,
    pub config: Arc<JwtConfig>,
}

/// Forward one request to the backend per the route table.
pub async fn forward(State(state): State<GatewayState>, req: Request<Body>) -> Response {
    let path = req.uri().path().to_string();

    let Some(route) = match_route(&state.routes, &path) else {
        tracing::warn!(%path, "No route matches");
        return problem(StatusCode::NOT_FOUND, "No route matches the request path");
    };

    if route.auth == RouteAuth::Bearer {
        if let Err(response) = check_bearer(&state.config, req.headers()) {
            return response;
        }
    }

    let mut url = format!("{}{}", route.upstream, path);
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let method = req.method().clone();
    let headers = forwardable_headers(req.headers());

    let body = match axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return problem(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
    };

    let upstream_response = match state
        .client
        .request(method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, %url, "Upstream request failed");
            return problem(StatusCode::BAD_GATEWAY, "Upstream service unreachable");
        }
    };

    let status = upstream_response.status();
    let response_headers = forwardable_headers(upstream_response.headers());

    let bytes = match upstream_response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, %url, "Failed to read upstream response");
            return problem(StatusCode::BAD_GATEWAY, "Upstream response unreadable");
        }
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    response
}

/// Verify the bearer token, rejecting with a 401 problem response.
fn check_bearer(config: &JwtConfig, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| problem(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;

    token::verify(config, token)
        .map(|_| ())
        .map_err(|e| e.into_response())
}

/// Headers safe to relay in either direction. Connection-level headers
/// and lengths are recomputed by the HTTP stacks on both sides.
fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        let skip = name == header::HOST
            || name == header::CONTENT_LENGTH
            || name == header::CONNECTION
            || name == header::TRANSFER_ENCODING
            || name == header::UPGRADE;
        if !skip {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// RFC 7807 problem response, matching the backend's error body shape.
fn problem(status: StatusCode, detail: &str) -> Response {
    let body = serde_json::json!({
        "type": format!("https://httpstatuses.io/{}", status.as_u16()),
        "title": status.canonical_reason().unwrap_or("Error"),
        "status": status.as_u16(),
        "detail": detail,
    });
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_routes() -> Vec<Route> {
        route_table("http://localhost:5100")
    }

    #[test]
    fn test_auth_prefix_is_public() {
        let routes = test_routes();
        let route = match_route(&routes, "/api/auth/login").unwrap();
        assert_eq!(route.auth, RouteAuth::Public);
    }

    #[test]
    fn test_patient_routes_require_bearer() {
        let routes = test_routes();
        for path in [
            "/api/patients",
            "/api/patients/42",
            "/api/patients/42/restore",
            "/api/patients/deleted",
        ] {
            let route = match_route(&routes, path).unwrap();
            assert_eq!(route.auth, RouteAuth::Bearer, "{path}");
        }
    }

    #[test]
    fn test_every_route_carries_an_upstream() {
        for route in test_routes() {
            assert_eq!(route.upstream, "http://localhost:5100");
        }
    }

    #[test]
    fn test_unknown_prefixes_do_not_match() {
        let routes = test_routes();
        assert!(match_route(&routes, "/api/unknown").is_none());
        assert!(match_route(&routes, "/").is_none());
        assert!(match_route(&routes, "/api").is_none());
    }

    #[test]
    fn test_prefix_match_respects_segment_boundary() {
        let routes = test_routes();
        assert!(match_route(&routes, "/api/authx").is_none());
        assert!(match_route(&routes, "/api/patientsextra").is_none());
    }

    #[test]
    fn test_missing_token_rejected_before_forwarding() {
        let config = JwtConfig::new(
            "0123456789abcdef0123456789abcdef".to_string(),
            "issuer".to_string(),
            "audience".to_string(),
        )
        .unwrap();

        let headers = HeaderMap::new();
        let response = check_bearer(&config, &headers).unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_valid_token_passes_bearer_check() {
        let config = JwtConfig::new(
            "0123456789abcdef0123456789abcdef".to_string(),
            "issuer".to_string(),
            "audience".to_string(),
        )
        .unwrap();

        let issued = token::issue(&config, "admin").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", issued.token).parse().unwrap(),
        );
        assert!(check_bearer(&config, &headers).is_ok());
    }

    #[test]
    fn test_hop_by_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "gateway.local".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, "42".parse().unwrap());
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());

        let forwarded = forwardable_headers(&headers);
        assert!(forwarded.get(header::HOST).is_none());
        assert!(forwarded.get(header::CONTENT_LENGTH).is_none());
        assert!(forwarded.get(header::AUTHORIZATION).is_some());
        assert!(forwarded.get(header::CONTENT_TYPE).is_some());
    }
}
