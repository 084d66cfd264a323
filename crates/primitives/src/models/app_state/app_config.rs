use crate::models::app_state::jwt_details::JWTInfo;
use crate::models::app_state::policies::{policy_from_env, FreeTicketPolicy, OtpSigninPolicy};
use crate::models::app_state::razorpay_details::RazorpayInfo;
use eyre::Report;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_details: JWTInfo,

    pub razorpay_details: RazorpayInfo,

    pub admin_emails: Vec<String>,

    /// Raw `code:discount;price,...` table. Parsed per request.
    pub coupon_codes: String,

    pub otp_signin_policy: OtpSigninPolicy,

    pub free_ticket_policy: FreeTicketPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            jwt_details: JWTInfo::new()?,

            razorpay_details: RazorpayInfo::new()?,

            admin_emails: parse_admin_emails(&env::var("ADMIN_EMAILS").unwrap_or_default()),

            coupon_codes: env::var("COUPON_CODES").unwrap_or_default(),

            otp_signin_policy: policy_from_env("OTP_SIGNIN_POLICY")?,

            free_ticket_policy: policy_from_env("FREE_TICKET_POLICY")?,
        })
    }
}

pub fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
