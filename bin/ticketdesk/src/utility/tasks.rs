use axum::routing::get;
use axum::Router;
use axum_prometheus::{metrics_exporter_prometheus::PrometheusHandle, PrometheusMetricLayer};
use eyre::Report;
use http::HeaderValue;
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use ticketdesk_core::clients::LogMailer;
use ticketdesk_core::repositories::{DbPool, PgStore};
use ticketdesk_core::AppState;
use ticketdesk_primitives::models::app_state::app_config::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub fn build_cors() -> Result<CorsLayer, Report> {
    let origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into());

    let allowed_origins = origins
        .split(',')
        .map(|s| s.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| eyre::eyre!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(allowed_origins))
}

pub fn load_env() {
    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env file");
    } else {
        info!("No .env file found, using system environment");
    }
}

/// Wires the Postgres store, the log mailer and the system clock into the services.
pub fn build_state(pool: DbPool, config: AppConfig) -> Result<Arc<AppState>, Report> {
    AppState::new(
        Arc::new(PgStore::new(pool)),
        config,
        Arc::new(LogMailer::new()),
        Arc::new(DefaultClock),
    )
}

pub fn build_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Result<Router, Report> {
    let cors = build_cors()?;

    Ok(ticketdesk_api::create_router(state)
        .route(
            "/metrics",
            get(move || std::future::ready(metric_handle.render())),
        )
        .layer(metric_layer)
        .layer(cors))
}
