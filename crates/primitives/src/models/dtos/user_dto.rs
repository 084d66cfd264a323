use crate::models::entities::ticket::{PurchasedTicket, TicketPrice};
use crate::models::entities::user::User;
use crate::utility::{normalize_email, validate_contact_number, validate_otp_code};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "user@example.com")]
    #[validate(email)]
    pub email: String,

    #[schema(example = "Ada Lovelace")]
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[schema(example = "9876543210")]
    #[validate(custom(function = "validate_contact_number"))]
    pub contact_number: String,

    #[schema(example = "042917")]
    #[validate(custom(function = "validate_otp_code"))]
    pub otp: String,

    /// Opaque registration payload, stored as-is.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub profile_data: Value,
}

impl RegisterRequest {
    pub fn normalize(mut self) -> Self {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
        self.contact_number = self.contact_number.trim().to_string();
        self.otp = self.otp.trim().to_string();
        if self.profile_data.is_null() {
            self.profile_data = Value::Object(Default::default());
        }
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TicketDto {
    pub id: Uuid,
    pub ticket_title: String,
    pub transaction_id: Option<String>,
    pub price: TicketPrice,
    pub is_accommodation: bool,
    pub coupon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PurchasedTicket> for TicketDto {
    fn from(ticket: PurchasedTicket) -> Self {
        Self {
            price: ticket.price(),
            id: ticket.id,
            ticket_title: ticket.ticket_title,
            transaction_id: ticket.transaction_id,
            is_accommodation: ticket.is_accommodation,
            coupon: ticket.coupon,
            created_at: ticket.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub contact_number: String,
    #[schema(value_type = Object)]
    pub profile_data: Value,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<TicketDto>,
}

impl CurrentUserResponse {
    pub fn new(user: User, tickets: Vec<PurchasedTicket>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            contact_number: user.contact_number,
            profile_data: user.profile_data,
            created_at: user.created_at,
            tickets: tickets.into_iter().map(TicketDto::from).collect(),
        }
    }
}
