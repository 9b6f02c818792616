//! Gateway Entry Point
//!
//! Reverse proxy in front of the API server. Routes are declared in
//! `proxy::route_table`; everything else is wiring.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use auth::JwtConfig;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::proxy::GatewayState;

mod proxy;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The gateway verifies the same signing key the backend issues with
    let config = Arc::new(JwtConfig::from_env()?);

    let backend_url =
        env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:5100".to_string());
    tracing::info!(%backend_url, "Forwarding to backend");

    let state = GatewayState {
        client: reqwest::Client::new(),
        routes: Arc::new(proxy::route_table(&backend_url)),
        config,
    };

    let app = Router::new()
        .fallback(proxy::forward)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let port: u16 = env::var("GATEWAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
