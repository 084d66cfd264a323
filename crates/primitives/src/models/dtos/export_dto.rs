use chrono::{DateTime, Utc};
use diesel::Queryable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An unverified transaction that has not been pushed downstream yet.
#[derive(Debug, Clone, Queryable, Serialize, Deserialize, ToSchema)]
pub struct PendingExportDto {
    pub transaction_id: String,
    pub user_id: Uuid,
    pub name: String,
    pub amount: i64,
    pub ticket_title: String,
    pub is_accommodation: bool,
    pub coupon: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingExportsResponse {
    pub transactions: Vec<PendingExportDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkPushedRequest {
    #[validate(length(min = 1, max = 1000))]
    pub transaction_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkPushedResponse {
    pub marked: usize,
}
