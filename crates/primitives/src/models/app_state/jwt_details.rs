use eyre::{eyre, Report};
use secrecy::SecretString;
use std::env;

/// Sessions are long-lived; clients re-authenticate with a fresh code after expiry.
pub const SESSION_VALIDITY_DAYS: i64 = 20;

const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct JWTInfo {
    pub jwt_secret: SecretString,
    pub jwt_expiration_days: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
}

impl JWTInfo {
    pub fn new() -> Result<JWTInfo, Report> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| eyre!("JWT_SECRET must be set"))?;

        Self::from_parts(
            jwt_secret,
            env::var("ISSUER").unwrap_or_else(|_| "ticketdesk".into()),
            env::var("AUDIENCE").unwrap_or_else(|_| "ticketdesk_api".into()),
        )
    }

    pub fn from_parts(
        jwt_secret: String,
        jwt_issuer: String,
        jwt_audience: String,
    ) -> Result<JWTInfo, Report> {
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(eyre!(
                "JWT_SECRET must be at least {} characters long",
                MIN_SECRET_LEN
            ));
        }

        Ok(Self {
            jwt_secret: SecretString::new(jwt_secret.into()),
            jwt_expiration_days: SESSION_VALIDITY_DAYS,
            jwt_issuer,
            jwt_audience,
        })
    }
}
