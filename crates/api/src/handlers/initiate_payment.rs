use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use ticketdesk_core::{AppState, AuthIdentity};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::ledger_dto::{
    InitiatePaymentRequest, InitiatePaymentResponse,
};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/payments/initiate",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 201, description = "Gateway order created", body = InitiatePaymentResponse),
        (status = 400, description = "Invalid amount"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Payment gateway failure")
    ),
    security(("bearerAuth" = [])),
    tag = "Payments"
)]
pub async fn initiate_payment(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AuthIdentity>,
    Json(payload): Json<InitiatePaymentRequest>,
) -> Result<(StatusCode, Json<InitiatePaymentResponse>), ApiError> {
    payload.validate()?;

    let order = state
        .ledger
        .initiate(identity.user_id, payload.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}
