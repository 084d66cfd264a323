use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use ticketdesk_core::AppState;
use ticketdesk_primitives::models::dtos::auth_dto::HealthStatus;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check endpoint",
    description = "Returns 200 when the store answers a trivial query, 503 otherwise. Public.",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is healthy", body = HealthStatus),
        (status = 503, description = "Store unreachable", body = HealthStatus),
    ),
    security(()),
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    match state.store.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: StatusCode::OK.to_string(),
                message: "API is healthy".to_string(),
            }),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: StatusCode::SERVICE_UNAVAILABLE.to_string(),
                    message: "Store unreachable".to_string(),
                }),
            )
        }
    }
}
