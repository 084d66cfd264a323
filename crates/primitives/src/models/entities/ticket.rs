use chrono::{DateTime, Utc};
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// What a ticket cost. Free grants are stored with a NULL price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TicketPrice {
    Paid { amount: i64 },
    Free,
}

impl TicketPrice {
    pub fn from_column(price: Option<i64>) -> Self {
        match price {
            Some(amount) => TicketPrice::Paid { amount },
            None => TicketPrice::Free,
        }
    }

    pub fn to_column(self) -> Option<i64> {
        match self {
            TicketPrice::Paid { amount } => Some(amount),
            TicketPrice::Free => None,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::purchased_tickets)]
#[diesel(belongs_to(crate::models::entities::user::User))]
pub struct PurchasedTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_id: Option<String>,
    pub ticket_title: String,
    pub price: Option<i64>,
    pub is_accommodation: bool,
    pub coupon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PurchasedTicket {
    pub fn price(&self) -> TicketPrice {
        TicketPrice::from_column(self.price)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::purchased_tickets)]
pub struct NewPurchasedTicket<'a> {
    pub user_id: Uuid,
    pub transaction_id: Option<&'a str>,
    pub ticket_title: &'a str,
    pub price: Option<i64>,
    pub is_accommodation: bool,
    pub coupon: Option<&'a str>,
}

/// A ticket together with whether this call created it.
#[derive(Debug, Clone)]
pub struct IssuedTicket {
    pub ticket: PurchasedTicket,
    pub newly_issued: bool,
}
