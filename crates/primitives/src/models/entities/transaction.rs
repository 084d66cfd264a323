use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

/// A payment attempt keyed by the gateway's own reference.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct Transaction {
    pub id: String,
    pub user_id: Uuid,
    pub amount: i64,
    pub ticket_title: String,
    pub is_accommodation: bool,
    pub coupon: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransaction<'a> {
    pub id: &'a str,
    pub user_id: Uuid,
    pub amount: i64,
    pub ticket_title: &'a str,
    pub is_accommodation: bool,
    pub coupon: Option<&'a str>,
}

/// Result of recording a pending transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Created(String),
    AlreadyExists,
}

/// Result of the pending -> settled transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Verified(Uuid),
    AlreadyVerified,
    NotFound,
}
