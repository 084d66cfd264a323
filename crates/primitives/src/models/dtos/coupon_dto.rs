use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyCouponRequest {
    #[schema(example = "SAVE10")]
    #[validate(length(min = 1, max = 64))]
    pub code: String,

    #[schema(example = 500)]
    pub original_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CouponQuote {
    pub discount: i64,
    pub new_price: i64,
}
