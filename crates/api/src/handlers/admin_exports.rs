use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::export_dto::{
    MarkPushedRequest, MarkPushedResponse, PendingExportsResponse,
};
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/admin/exports/transactions",
    responses(
        (status = 200, description = "Unsettled transactions not yet exported, oldest first", body = PendingExportsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn pending_exports(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
) -> Result<Json<PendingExportsResponse>, ApiError> {
    state.admin.require_admin(&identity)?;

    Ok(Json(PendingExportsResponse {
        transactions: state.exports.pending_exports()?,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/exports/transactions",
    request_body = MarkPushedRequest,
    responses(
        (status = 200, description = "Number of newly marked transactions", body = MarkPushedResponse),
        (status = 400, description = "Empty batch"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn mark_pushed(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(payload): Json<MarkPushedRequest>,
) -> Result<Json<MarkPushedResponse>, ApiError> {
    state.admin.require_admin(&identity)?;
    payload.validate()?;

    Ok(Json(MarkPushedResponse {
        marked: state.exports.mark_pushed(&payload.transaction_ids)?,
    }))
}
