use crate::models::entities::ticket::TicketPrice;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InitiatePaymentRequest {
    /// Amount in the smallest currency unit.
    #[schema(example = 50000)]
    #[validate(range(min = 1))]
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitiatePaymentResponse {
    pub order_id: String,
    pub receipt: String,
    pub amount: i64,
    pub currency: String,
    pub name: String,
    pub email: String,
    pub contact_number: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PurchaseRequest {
    /// Gateway payment reference. Required unless the price is free.
    #[schema(example = "pay_29QQoUBi66xm2f")]
    #[validate(length(min = 1, max = 128))]
    pub transaction_id: Option<String>,

    #[schema(example = "Conference Pass")]
    #[validate(length(min = 1, max = 200))]
    pub ticket_title: String,

    pub price: TicketPrice,

    #[serde(default)]
    pub is_accommodation: bool,

    pub coupon: Option<String>,
}

impl PurchaseRequest {
    /// Trims every text field; blank optional fields become `None`.
    pub fn normalize(mut self) -> Self {
        self.transaction_id = trimmed_or_none(self.transaction_id);
        self.ticket_title = self.ticket_title.trim().to_string();
        self.coupon = trimmed_or_none(self.coupon);
        self
    }
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Recorded as pending, awaiting settlement.
    Pending,
    AlreadyRecorded,
    FreeIssued,
    FreeAlreadyIssued,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub status: PurchaseStatus,
    pub transaction_id: Option<String>,
    pub ticket_title: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettleRequest {
    #[schema(example = "pay_29QQoUBi66xm2f")]
    #[validate(length(min = 1, max = 128))]
    pub transaction_id: String,

    /// Amount the gateway reports as captured.
    #[schema(example = 50000)]
    pub amount: i64,
}

impl SettleRequest {
    pub fn normalize(mut self) -> Self {
        self.transaction_id = self.transaction_id.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettleStatus {
    Verified,
    AlreadyVerified,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettleResponse {
    pub status: SettleStatus,
    pub user_id: Option<Uuid>,
    pub ticket_title: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct IssueTicketRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 128))]
    pub transaction_id: String,
}

impl IssueTicketRequest {
    pub fn normalize(mut self) -> Self {
        self.transaction_id = self.transaction_id.trim().to_string();
        self
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueTicketResponse {
    pub ticket_title: String,
    pub newly_issued: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(title: &str, txn: Option<&str>, coupon: Option<&str>) -> PurchaseRequest {
        PurchaseRequest {
            transaction_id: txn.map(String::from),
            ticket_title: title.into(),
            price: TicketPrice::Paid { amount: 500 },
            is_accommodation: false,
            coupon: coupon.map(String::from),
        }
    }

    #[test]
    fn blank_title_fails_after_normalizing() {
        let request = purchase("   ", Some("pay_A1"), None).normalize();
        assert_eq!(request.ticket_title, "");
        assert!(request.validate().is_err());
    }

    #[test]
    fn blank_optionals_become_none() {
        let request = purchase(" Pass ", Some("  "), Some(" \t")).normalize();
        assert_eq!(request.ticket_title, "Pass");
        assert_eq!(request.transaction_id, None);
        assert_eq!(request.coupon, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn padded_ids_are_trimmed() {
        let request = purchase("Pass", Some(" pay_A1 "), Some(" SAVE10 ")).normalize();
        assert_eq!(request.transaction_id.as_deref(), Some("pay_A1"));
        assert_eq!(request.coupon.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn blank_settle_id_fails_after_normalizing() {
        let request = SettleRequest {
            transaction_id: "   ".into(),
            amount: 500,
        }
        .normalize();
        assert!(request.validate().is_err());
    }
}
