use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use ticketdesk_core::services::PendingPayment;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::ledger_dto::{
    PurchaseRequest, PurchaseResponse, PurchaseStatus,
};
use ticketdesk_primitives::models::entities::ticket::TicketPrice;
use ticketdesk_primitives::models::entities::transaction::RecordOutcome;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Recorded as pending, or free ticket granted", body = PurchaseResponse),
        (status = 200, description = "Already recorded or already granted", body = PurchaseResponse),
        (status = 400, description = "Invalid input or unknown coupon"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearerAuth" = [])),
    tag = "Payments"
)]
pub async fn record_purchase(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(payload): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>), ApiError> {
    let payload = payload.normalize();
    payload.validate()?;
    let ticket_title = payload.ticket_title.as_str();
    let coupon = payload.coupon.as_deref();

    match payload.price {
        TicketPrice::Free => {
            let issued =
                state
                    .tickets
                    .issue_free(identity.user_id, ticket_title, payload.is_accommodation)?;

            let (code, status) = if issued.newly_issued {
                (StatusCode::CREATED, PurchaseStatus::FreeIssued)
            } else {
                (StatusCode::OK, PurchaseStatus::FreeAlreadyIssued)
            };
            Ok((
                code,
                Json(PurchaseResponse {
                    status,
                    transaction_id: None,
                    ticket_title: issued.ticket.ticket_title,
                }),
            ))
        }
        TicketPrice::Paid { amount } => {
            let txn_id = payload
                .transaction_id
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("transaction_id is required".into()))?;

            let outcome = state.ledger.record_pending(PendingPayment {
                txn_id,
                user_id: identity.user_id,
                amount,
                ticket_title,
                is_accommodation: payload.is_accommodation,
                coupon,
            })?;

            let (code, status) = match outcome {
                RecordOutcome::Created(_) => (StatusCode::CREATED, PurchaseStatus::Pending),
                RecordOutcome::AlreadyExists => (StatusCode::OK, PurchaseStatus::AlreadyRecorded),
            };
            Ok((
                code,
                Json(PurchaseResponse {
                    status,
                    transaction_id: Some(txn_id.to_string()),
                    ticket_title: ticket_title.to_string(),
                }),
            ))
        }
    }
}
