//! Bearer-Token Middleware
//!
//! Verifies the `Authorization: Bearer` token before protected handlers
//! run and injects the verified caller as a [`kernel::Actor`] request
//! extension.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use kernel::Actor;

use crate::application::config::JwtConfig;
use crate::error::AuthError;
use crate::token;

/// Middleware state
#[derive(Clone)]
pub struct BearerAuthState {
    pub config: Arc<JwtConfig>,
}

impl BearerAuthState {
    pub fn new(config: Arc<JwtConfig>) -> Self {
        Self { config }
    }
}

/// Middleware that rejects requests without a valid bearer token.
///
/// On success the verified username is available to handlers as
/// `Extension<Actor>`.
pub async fn require_bearer(
    State(state): State<BearerAuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_bearer(&req) {
        Some(t) => t,
        None => return Err(AuthError::MissingToken.into_response()),
    };

    let claims = match token::verify(&state.config, token) {
        Ok(c) => c,
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(Actor::named(claims.sub));

    Ok(next.run(req).await)
}

fn extract_bearer(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
