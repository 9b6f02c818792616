//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::domain::repository::UserRepository;
use auth::middleware::{BearerAuthState, require_bearer};
use auth::{JwtConfig, PgUserRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use patients::{PgPatientStore, patients_router};
use platform::password::ClearTextPassword;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,patients=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Token configuration; startup fails on a missing or weak key
    let jwt_config = Arc::new(JwtConfig::from_env()?);

    let user_repo = PgUserRepository::new(pool.clone());
    seed_admin_user(&user_repo).await?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5170,http://127.0.0.1:5170".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Patient routes sit behind the bearer middleware; auth routes do not
    let patient_routes = patients_router(PgPatientStore::new(pool.clone())).route_layer(
        middleware::from_fn_with_state(BearerAuthState::new(jwt_config.clone()), require_bearer),
    );

    let app = Router::new()
        .nest("/api/auth", auth_router(user_repo, jwt_config))
        .nest("/api/patients", patient_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("API_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5100);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the initial admin account when the identity store is empty.
///
/// Reads `ADMIN_USERNAME`/`ADMIN_PASSWORD`; skips seeding when either is
/// unset so an already-provisioned database starts without them.
async fn seed_admin_user(repo: &PgUserRepository) -> anyhow::Result<()> {
    if repo.count().await? > 0 {
        return Ok(());
    }

    let (Ok(username), Ok(password)) = (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD"))
    else {
        tracing::warn!("Identity store is empty and no admin credentials configured");
        return Ok(());
    };

    let hashed = ClearTextPassword::new(password)?.hash()?;
    let id = repo.insert(&username, hashed.as_phc_string()).await?;
    tracing::info!(user_id = id, username = %username, "Seeded admin user");

    Ok(())
}
