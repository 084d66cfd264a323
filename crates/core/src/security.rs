use crate::app_state::AppState;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ticketdesk_primitives::error::{ApiError, AuthError};
use ticketdesk_primitives::models::app_state::jwt_details::JWTInfo;
use tracing::error;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|e| {
            error!("Invalid user ID in claims: {}", e);
            AuthError::InvalidToken("Invalid user ID".to_string())
        })
    }
}

/// The caller behind a verified bearer token. Inserted as a request extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Clone)]
pub struct SecurityConfig {
    jwt: JWTInfo,
}

impl SecurityConfig {
    pub fn new(jwt: JWTInfo) -> Self {
        Self { jwt }
    }

    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<String, ApiError> {
        self.create_token_at(user_id, email, Utc::now())
    }

    pub fn create_token_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.jwt.jwt_expiration_days)).timestamp(),
            iss: self.jwt.jwt_issuer.clone(),
            aud: self.jwt.jwt_audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.jwt.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            error!("JWT encoding error: {}", e);
            ApiError::Internal("Token creation failed".into())
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.jwt.jwt_issuer.as_str()]);
        validation.set_audience(&[self.jwt.jwt_audience.as_str()]);
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt.jwt_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken("Invalid or expired token".into()))
    }

    pub fn identity(&self, token: &str) -> Result<AuthIdentity, AuthError> {
        let claims = self.verify_token(token)?;
        Ok(AuthIdentity {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }

    fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
        let auth_header = headers
            .get("Authorization")
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidFormat)?
            .trim();

        if token.is_empty() {
            return Err(AuthError::InvalidFormat);
        }

        Ok(token)
    }

    pub async fn auth_middleware(
        State(state): State<Arc<AppState>>,
        mut req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let identity = Self::extract_bearer_token(req.headers())
            .and_then(|token| state.security.identity(token))
            .map_err(|e| ApiError::from(e).into_response())?;

        req.extensions_mut().insert(identity);
        Ok(next.run(req).await)
    }
}

/// Allow-list of privileged emails, compared case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct AdminGate {
    admins: Vec<String>,
}

impl AdminGate {
    pub fn new(admins: &[String]) -> Self {
        Self {
            admins: admins.iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    pub fn is_admin(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admins.iter().any(|a| *a == email)
    }

    pub fn require_admin(&self, identity: &AuthIdentity) -> Result<(), ApiError> {
        if self.is_admin(&identity.email) {
            Ok(())
        } else {
            tracing::warn!(user_id = %identity.user_id, "non-admin attempted privileged action");
            Err(ApiError::Auth(AuthError::Forbidden))
        }
    }
}
