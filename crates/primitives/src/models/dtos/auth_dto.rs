use crate::utility::{normalize_email, validate_otp_code};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendOtpRequest {
    #[schema(example = "user@example.com")]
    #[validate(email)]
    pub email: String,
}

impl SendOtpRequest {
    pub fn normalize(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[schema(example = "user@example.com")]
    #[validate(email)]
    pub email: String,

    #[schema(example = "042917")]
    #[validate(custom(function = "validate_otp_code"))]
    pub otp: String,
}

impl VerifyOtpRequest {
    pub fn normalize(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.otp = self.otp.trim().to_string();
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyOtpResponse {
    pub valid: bool,
}

/// Signing in takes the same shape as checking a code.
pub type SigninRequest = VerifyOtpRequest;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SigninResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// --- Health ---

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}
