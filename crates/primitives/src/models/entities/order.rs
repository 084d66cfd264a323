use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::Serialize;
use uuid::Uuid;

/// Advisory record of a gateway order. Never consulted by settlement.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct Order {
    pub id: Uuid,
    pub gateway_order_id: String,
    pub user_id: Uuid,
    pub amount: i64,
    pub receipt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub gateway_order_id: &'a str,
    pub user_id: Uuid,
    pub amount: i64,
    pub receipt: &'a str,
}
