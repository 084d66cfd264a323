use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub receipt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: Option<String>,
}
