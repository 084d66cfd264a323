use chrono::{DateTime, Duration, Utc};
use diesel::{Identifiable, Insertable, Queryable, Selectable};

/// How long an issued code stays usable.
pub const OTP_VALIDITY_MINUTES: i64 = 50;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::otps, primary_key(email))]
pub struct OtpRecord {
    pub email: String,
    pub code_hash: String,
    pub issued_at: DateTime<Utc>,
    pub consumed: bool,
}

impl OtpRecord {
    /// A record is live while unconsumed and no older than the validity window.
    /// The boundary itself is inclusive.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.consumed && now - self.issued_at <= Duration::minutes(OTP_VALIDITY_MINUTES)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::otps)]
pub struct NewOtp<'a> {
    pub email: &'a str,
    pub code_hash: &'a str,
    pub issued_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(consumed: bool) -> OtpRecord {
        OtpRecord {
            email: "a@x.com".into(),
            code_hash: "h".into(),
            issued_at: Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap(),
            consumed,
        }
    }

    #[test]
    fn window_is_inclusive_at_fifty_minutes() {
        let rec = record(false);
        assert!(rec.is_live_at(rec.issued_at + Duration::minutes(50)));
        assert!(!rec.is_live_at(rec.issued_at + Duration::minutes(50) + Duration::seconds(1)));
    }

    #[test]
    fn consumed_record_is_never_live() {
        let rec = record(true);
        assert!(!rec.is_live_at(rec.issued_at));
    }
}
