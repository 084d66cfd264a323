use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::pass_dto::PassDispatchResponse;

#[utoipa::path(
    post,
    path = "/api/admin/passes/send",
    responses(
        (status = 200, description = "Passes mailed to every ticket holder; undeliverable recipients are counted as failed", body = PassDispatchResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn send_passes(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<PassDispatchResponse>, ApiError> {
    state.admin.require_admin(&identity)?;

    Ok(Json(state.tickets.send_passes().await?))
}
