use chrono::{DateTime, Utc};
use diesel::Queryable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One ticket and the attendee who holds it. The ticket id doubles as the pass id.
#[derive(Debug, Clone, Queryable, Serialize, Deserialize, ToSchema)]
pub struct PassHolder {
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub ticket_title: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PassDispatchResponse {
    pub recipients: usize,
    pub sent: usize,
    pub failed: usize,
}
