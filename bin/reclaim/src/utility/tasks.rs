use axum::Router;
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use eyre::{eyre, Report};
use http::{header, HeaderName, HeaderValue, Method};
use reclaim_core::app_state::AppState;
use reclaim_core::security::API_KEY_HEADER;
use std::env;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

pub fn build_cors() -> Result<CorsLayer, Report> {
    let origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());

    let allowed_origins = origins
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| eyre!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_origin(allowed_origins))
}

pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    } else {
        info!("No .env file found, using system environment");
    }
}

pub fn build_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Result<Router, Report> {
    let cors = build_cors()?;

    Ok(reclaim_api::app::create_router(state, metric_layer, metric_handle).layer(cors))
}

/// Applies pending migrations. Disable with `RUN_MIGRATIONS=false`.
pub fn initialize_system(state: &Arc<AppState>) -> Result<(), Report> {
    if env::var("RUN_MIGRATIONS").is_ok_and(|v| v.eq_ignore_ascii_case("false")) {
        info!("Skipping migrations");
        return Ok(());
    }

    let mut conn = state.db.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    info!(count = applied.len(), "Database migrations applied");
    Ok(())
}
