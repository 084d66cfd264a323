use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    admin_exports::{mark_pushed, pending_exports},
    admin_issue_ticket::issue_ticket,
    admin_send_passes::send_passes,
    admin_settle::settle_transaction,
    apply_coupon::apply_coupon,
    current_user::current_user_details,
    health::health_check,
    initiate_payment::initiate_payment,
    purchase::record_purchase,
    signin::{send_signin_otp, signin},
    signup::{register, send_signup_otp, verify_signup_otp},
};
use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use ticketdesk_core::{AppState, SecurityConfig};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_router(state: Arc<AppState>) -> Router {
    let public_router = create_public_routers();
    let protected_router = create_secured_routers(&state);

    let mut router = Router::new()
        .merge(public_router)
        .merge(protected_router)
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(middleware::from_fn(https_redirect_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        );

    // the governor keys on peer IP, which test servers do not provide
    if std::env::var("APP_ENV").unwrap_or_default() != "test" {
        match GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
        {
            Some(conf) => router = router.layer(GovernorLayer::new(Arc::new(conf))),
            None => warn!("invalid rate limit configuration, governor disabled"),
        }
    }

    router.with_state(state)
}

fn create_secured_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(current_user_details))
        .route("/api/payments/initiate", post(initiate_payment))
        .route("/api/transactions", post(record_purchase))
        .route("/api/coupons/apply", post(apply_coupon))
        .route("/api/admin/transactions/settle", post(settle_transaction))
        .route("/api/admin/tickets/issue", post(issue_ticket))
        .route("/api/admin/passes/send", post(send_passes))
        .route(
            "/api/admin/exports/transactions",
            get(pending_exports).post(mark_pushed),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_public_routers() -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health_check))
        .route("/api/signup/otp/send", post(send_signup_otp))
        .route("/api/signup/otp/verify", post(verify_signup_otp))
        .route("/api/signup", post(register))
        .route("/api/signin/otp/send", post(send_signin_otp))
        .route("/api/signin", post(signin))
}

async fn https_redirect_middleware(
    req: axum::extract::Request,
    next: middleware::Next,
) -> axum::response::Response {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    if env == "production" {
        let headers = req.headers();
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok());

        if let Some("http") = proto {
            let host = headers
                .get("host")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");

            let path_and_query = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("");
            let redirect_url = format!("https://{}{}", host, path_and_query);

            return axum::response::Redirect::permanent(&redirect_url).into_response();
        }
    }

    next.run(req).await
}
