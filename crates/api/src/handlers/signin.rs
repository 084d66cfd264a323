use axum::extract::{Json, State};
use std::sync::Arc;
use ticketdesk_core::AppState;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::auth_dto::{
    MessageResponse, SendOtpRequest, SigninRequest, SigninResponse,
};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/signin/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 400, description = "Invalid email"),
        (status = 404, description = "No account for this email"),
        (status = 502, description = "Code could not be delivered")
    ),
    tag = "Authentication"
)]
pub async fn send_signin_otp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    state.otp.send_signin_code(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Signed in", body = SigninResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid or expired code")
    ),
    tag = "Authentication"
)]
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    Ok(Json(state.users.signin(&payload.email, &payload.otp)?))
}
