use crate::clients::Mailer;
use crate::repositories::Store;
use chrono::Duration;
use mockable::Clock;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::entities::otp::OTP_VALIDITY_MINUTES;
use tracing::{info, warn};

const CODE_SPACE: u32 = 1_000_000;

/// Issues, checks and consumes one-time codes. One live code per email.
pub struct OtpService {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl OtpService {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            store,
            mailer,
            clock,
        }
    }

    fn generate_code() -> String {
        let n = rand::thread_rng().gen_range(0..CODE_SPACE);
        format!("{:06}", n)
    }

    pub(crate) fn hash_code(code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Stores a fresh code for `email`, replacing any earlier one, and mails it.
    ///
    /// The record is kept if delivery fails; the caller can ask again.
    pub async fn request_code(&self, email: &str) -> Result<String, ApiError> {
        let code = Self::generate_code();
        self.store
            .upsert_otp(email, &Self::hash_code(&code), self.clock.utc())?;

        self.mailer.send_otp(email, &code).await.map_err(|e| {
            warn!(email, error = %e, "otp delivery failed");
            ApiError::Upstream("Could not deliver verification code".into())
        })?;

        info!(email, "otp issued");
        Ok(code)
    }

    /// True iff a live code for `email` matches. Does not consume it.
    pub fn verify_code(&self, email: &str, code: &str) -> Result<bool, ApiError> {
        let Some(record) = self.store.find_otp(email)? else {
            return Ok(false);
        };

        Ok(record.code_hash == Self::hash_code(code) && record.is_live_at(self.clock.utc()))
    }

    /// Checks and consumes the code in one store call. Of any number of
    /// concurrent callers holding the same code, at most one gets `true`.
    pub fn redeem(&self, email: &str, code: &str) -> Result<bool, ApiError> {
        let issued_after = self.clock.utc() - Duration::minutes(OTP_VALIDITY_MINUTES);
        let redeemed = self
            .store
            .consume_if_live(email, &Self::hash_code(code), issued_after)?;

        if redeemed {
            info!(email, "otp redeemed");
        }
        Ok(redeemed)
    }

    pub async fn send_signup_code(&self, email: &str) -> Result<(), ApiError> {
        if self.store.find_user_by_email(email)?.is_some() {
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        self.request_code(email).await.map(|_| ())
    }

    pub async fn send_signin_code(&self, email: &str) -> Result<(), ApiError> {
        if self.store.find_user_by_email(email)?.is_none() {
            return Err(ApiError::NotFound("No account for this email".into()));
        }
        self.request_code(email).await.map(|_| ())
    }
}
