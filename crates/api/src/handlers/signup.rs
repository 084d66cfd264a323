use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use ticketdesk_core::AppState;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::auth_dto::{
    MessageResponse, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse,
};
use ticketdesk_primitives::models::dtos::user_dto::{RegisterRequest, RegisterResponse};
use tracing::error;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/signup/otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 400, description = "Invalid email"),
        (status = 409, description = "Email already registered"),
        (status = 502, description = "Code could not be delivered")
    ),
    tag = "Authentication"
)]
pub async fn send_signup_otp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    state.otp.send_signup_code(&payload.email).await?;

    Ok(Json(MessageResponse {
        message: "Verification code sent".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/signup/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Whether the code is currently valid", body = VerifyOtpResponse),
        (status = 400, description = "Malformed request")
    ),
    tag = "Authentication"
)]
pub async fn verify_signup_otp(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, ApiError> {
    let payload = payload.normalize();
    payload.validate()?;

    let valid = state.otp.verify_code(&payload.email, &payload.otp)?;
    Ok(Json(VerifyOtpResponse { valid }))
}

#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Invalid or expired code"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let resp = state.users.register(payload).map_err(|e| {
        error!("Registration failed: {}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(resp)))
}
