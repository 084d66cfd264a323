use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;

#[derive(Debug, Clone)]
pub struct RazorpayInfo {
    pub razorpay_api_key: String,
    pub razorpay_api_secret: SecretString,
    pub razorpay_api_url: String,
    pub currency: String,
}

impl RazorpayInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            razorpay_api_key: env::var("RAZORPAY_API_KEY")
                .map_err(|_| eyre!("RAZORPAY_API_KEY must be set"))?,

            razorpay_api_secret: SecretString::new(
                env::var("RAZORPAY_API_SECRET")
                    .map_err(|_| eyre!("RAZORPAY_API_SECRET must be set"))?
                    .into(),
            ),

            razorpay_api_url: env::var("RAZORPAY_API_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".into()),

            currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".into()),
        })
    }
}
