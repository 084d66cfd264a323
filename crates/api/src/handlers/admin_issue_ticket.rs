use axum::extract::{Extension, Json, State};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::ledger_dto::{IssueTicketRequest, IssueTicketResponse};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/admin/tickets/issue",
    request_body = IssueTicketRequest,
    responses(
        (status = 200, description = "Ticket for the settled transaction", body = IssueTicketResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "No settled transaction for this user")
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn issue_ticket(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(payload): Json<IssueTicketRequest>,
) -> Result<Json<IssueTicketResponse>, ApiError> {
    state.admin.require_admin(&identity)?;
    let payload = payload.normalize();
    payload.validate()?;

    let issued = state
        .tickets
        .issue_from_transaction(payload.user_id, &payload.transaction_id)?;

    Ok(Json(IssueTicketResponse {
        ticket_title: issued.ticket.ticket_title,
        newly_issued: issued.newly_issued,
    }))
}
