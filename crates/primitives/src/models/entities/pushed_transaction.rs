use chrono::{DateTime, Utc};
use diesel::{Queryable, Selectable};

/// Append-only marker: the transaction has been exported downstream.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::pushed_transactions)]
pub struct PushedTransaction {
    pub transaction_id: String,
    pub pushed_at: DateTime<Utc>,
}
