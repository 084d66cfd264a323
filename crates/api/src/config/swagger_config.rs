use crate::handlers::{
    admin_exports::{__path_mark_pushed, __path_pending_exports},
    admin_issue_ticket::__path_issue_ticket,
    admin_send_passes::__path_send_passes,
    admin_settle::__path_settle_transaction,
    apply_coupon::__path_apply_coupon,
    current_user::__path_current_user_details,
    health::__path_health_check,
    initiate_payment::__path_initiate_payment,
    purchase::__path_record_purchase,
    signin::{__path_send_signin_otp, __path_signin},
    signup::{__path_register, __path_send_signup_otp, __path_verify_signup_otp},
};
use ticketdesk_primitives::models::*;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check, send_signup_otp, verify_signup_otp, register,
        send_signin_otp, signin, current_user_details, initiate_payment,
        record_purchase, apply_coupon, settle_transaction, issue_ticket,
        send_passes, pending_exports, mark_pushed
    ),
    components(schemas(TicketPrice, TicketDto, PurchaseStatus, SettleStatus)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "One-time codes, signup and signin"),
        (name = "User", description = "The signed-in user"),
        (name = "Payments", description = "Payment orders, pending transactions and coupons"),
        (name = "Admin", description = "Settlement, ticket issuance, passes and exports"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
