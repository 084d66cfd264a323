use crate::clients::Mailer;
use crate::repositories::Store;
use crate::security::SecurityConfig;
use crate::services::otp_service::OtpService;
use std::sync::Arc;
use ticketdesk_primitives::error::{ApiError, AuthError};
use ticketdesk_primitives::models::app_state::policies::OtpSigninPolicy;
use ticketdesk_primitives::models::dtos::auth_dto::SigninResponse;
use ticketdesk_primitives::models::dtos::user_dto::{
    CurrentUserResponse, RegisterRequest, RegisterResponse,
};
use ticketdesk_primitives::models::entities::user::NewUser;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct UserService {
    store: Arc<dyn Store>,
    otp: Arc<OtpService>,
    security: SecurityConfig,
    mailer: Arc<dyn Mailer>,
    signin_policy: OtpSigninPolicy,
}

impl UserService {
    pub fn new(
        store: Arc<dyn Store>,
        otp: Arc<OtpService>,
        security: SecurityConfig,
        mailer: Arc<dyn Mailer>,
        signin_policy: OtpSigninPolicy,
    ) -> Self {
        Self {
            store,
            otp,
            security,
            mailer,
            signin_policy,
        }
    }

    pub fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let req = req.normalize();
        req.validate()?;

        if self.store.find_user_by_email(&req.email)?.is_some() {
            return Err(ApiError::Conflict("Email already registered".into()));
        }

        // redeemed before the insert; a failed insert costs the caller a new code
        if !self.otp.redeem(&req.email, &req.otp)? {
            return Err(ApiError::Auth(AuthError::InvalidOtp));
        }

        let user = self.store.create_user(NewUser {
            email: &req.email,
            name: &req.name,
            contact_number: &req.contact_number,
            profile_data: req.profile_data.clone(),
        })?;

        let token = self.security.create_token(user.id, &user.email)?;

        info!(user_id = %user.id, "user registered");

        let mailer = Arc::clone(&self.mailer);
        let (email, name) = (user.email.clone(), user.name.clone());
        tokio::spawn(async move {
            if let Err(e) = mailer.send_welcome(&email, &name).await {
                warn!(email = %email, error = %e, "welcome email not delivered");
            }
        });

        Ok(RegisterResponse {
            user_id: user.id,
            token,
        })
    }

    pub fn signin(&self, email: &str, code: &str) -> Result<SigninResponse, ApiError> {
        let user = self
            .store
            .find_user_by_email(email)?
            .ok_or(ApiError::Auth(AuthError::InvalidOtp))?;

        let accepted = match self.signin_policy {
            OtpSigninPolicy::ReuseWithinWindow => self.otp.verify_code(email, code)?,
            OtpSigninPolicy::ConsumeOnSignin => self.otp.redeem(email, code)?,
        };
        if !accepted {
            return Err(ApiError::Auth(AuthError::InvalidOtp));
        }

        let token = self.security.create_token(user.id, &user.email)?;
        info!(user_id = %user.id, "user signed in");

        Ok(SigninResponse {
            token,
            user_id: user.id,
        })
    }

    pub fn current_user(&self, user_id: Uuid) -> Result<CurrentUserResponse, ApiError> {
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
        let tickets = self.store.tickets_for_user(user_id)?;

        Ok(CurrentUserResponse::new(user, tickets))
    }
}
