use super::PgStore;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::entities::otp::{NewOtp, OtpRecord};
use ticketdesk_primitives::schema::otps;

pub trait OtpRepository: Send + Sync {
    /// Overwrites any previous code for the email and clears `consumed`.
    fn upsert_otp(
        &self,
        email: &str,
        code_hash: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError>;

    fn find_otp(&self, email: &str) -> Result<Option<OtpRecord>, ApiError>;

    /// Marks the code consumed only if it matches, is unconsumed and was issued
    /// at or after `issued_after`. True for exactly one caller per issued code.
    fn consume_if_live(
        &self,
        email: &str,
        code_hash: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<bool, ApiError>;
}

impl OtpRepository for PgStore {
    fn upsert_otp(
        &self,
        email: &str,
        code_hash: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut conn = self.conn()?;
        diesel::insert_into(otps::table)
            .values(&NewOtp {
                email,
                code_hash,
                issued_at,
            })
            .on_conflict(otps::email)
            .do_update()
            .set((
                otps::code_hash.eq(code_hash),
                otps::issued_at.eq(issued_at),
                otps::consumed.eq(false),
            ))
            .execute(&mut conn)
            .map(|_| ())
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn find_otp(&self, email: &str) -> Result<Option<OtpRecord>, ApiError> {
        let mut conn = self.conn()?;
        otps::table
            .find(email)
            .select(OtpRecord::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn consume_if_live(
        &self,
        email: &str,
        code_hash: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let mut conn = self.conn()?;
        diesel::update(
            otps::table
                .filter(otps::email.eq(email))
                .filter(otps::code_hash.eq(code_hash))
                .filter(otps::consumed.eq(false))
                .filter(otps::issued_at.ge(issued_after)),
        )
        .set(otps::consumed.eq(true))
        .execute(&mut conn)
        .map(|rows| rows == 1)
        .map_err(|e| ApiError::Database(e.to_string()))
    }
}
