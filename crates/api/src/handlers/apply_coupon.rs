use axum::extract::{Json, State};
use std::sync::Arc;
use ticketdesk_core::services::CouponOutcome;
use ticketdesk_core::AppState;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::coupon_dto::{ApplyCouponRequest, CouponQuote};
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/coupons/apply",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Discount and discounted price", body = CouponQuote),
        (status = 400, description = "Coupon does not apply to this price"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown coupon"),
        (status = 500, description = "Coupon table misconfigured")
    ),
    security(("bearerAuth" = [])),
    tag = "Payments"
)]
pub async fn apply_coupon(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ApplyCouponRequest>,
) -> Result<Json<CouponQuote>, ApiError> {
    payload.validate()?;

    match state.coupons.evaluate(&payload.code, payload.original_price)? {
        CouponOutcome::Applied(quote) => Ok(Json(quote)),
        CouponOutcome::NotFound => Err(ApiError::NotFound("Invalid coupon code".into())),
        CouponOutcome::PriceMismatch => Err(ApiError::BadRequest(
            "Coupon is not applicable to this price".into(),
        )),
    }
}
