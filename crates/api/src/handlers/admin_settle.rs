use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::ledger_dto::{
    SettleRequest, SettleResponse, SettleStatus,
};
use ticketdesk_primitives::models::entities::transaction::SettleOutcome;
use tracing::info;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/admin/transactions/settle",
    request_body = SettleRequest,
    responses(
        (status = 200, description = "Settled now or already settled; either way the ticket exists afterwards", body = SettleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Unknown transaction")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn settle_transaction(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(payload): Json<SettleRequest>,
) -> Result<Json<SettleResponse>, ApiError> {
    state.admin.require_admin(&identity)?;
    let payload = payload.normalize();
    payload.validate()?;

    let txn_id = payload.transaction_id.as_str();

    match state.ledger.settle(txn_id, payload.amount)? {
        SettleOutcome::Verified(user_id) => {
            let issued = state.tickets.issue_from_transaction(user_id, txn_id)?;
            info!(txn_id, admin = %identity.email, "settled by admin");
            Ok(Json(SettleResponse {
                status: SettleStatus::Verified,
                user_id: Some(user_id),
                ticket_title: Some(issued.ticket.ticket_title),
            }))
        }
        SettleOutcome::AlreadyVerified => {
            // a retry after a failed issuance credits the missing ticket
            let issued = state.tickets.ensure_issued(txn_id)?;
            Ok(Json(SettleResponse {
                status: SettleStatus::AlreadyVerified,
                user_id: Some(issued.ticket.user_id),
                ticket_title: Some(issued.ticket.ticket_title),
            }))
        }
        SettleOutcome::NotFound => Err(ApiError::NotFound(format!(
            "Transaction {} not found",
            txn_id
        ))),
    }
}
