use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use http::StatusCode;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use ticketdesk_core::repositories::memory::InMemoryStore;
use ticketdesk_core::test_support::{MutableClock, RecordingMailer};
use ticketdesk_core::AppState;
use ticketdesk_primitives::models::app_state::app_config::{parse_admin_emails, AppConfig};
use ticketdesk_primitives::models::app_state::jwt_details::JWTInfo;
use ticketdesk_primitives::models::app_state::policies::{FreeTicketPolicy, OtpSigninPolicy};
use ticketdesk_primitives::models::app_state::razorpay_details::RazorpayInfo;
use uuid::Uuid;

pub mod fixtures;

pub const ADMIN_EMAIL: &str = "admin@ticketdesk.test";

pub struct TestOptions {
    pub gateway_url: String,
    pub coupon_codes: String,
    pub otp_signin_policy: OtpSigninPolicy,
    pub free_ticket_policy: FreeTicketPolicy,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:9".into(),
            coupon_codes: "SAVE10:10;500,EARLY:100;1000".into(),
            otp_signin_policy: OtpSigninPolicy::default(),
            free_ticket_policy: FreeTicketPolicy::default(),
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub clock: Arc<MutableClock>,
}

pub fn test_config(options: &TestOptions) -> AppConfig {
    AppConfig {
        jwt_details: JWTInfo::from_parts(
            "test_secret_key_minimum_32_characters_long_for_testing".into(),
            "ticketdesk".into(),
            "ticketdesk_api".into(),
        )
        .unwrap(),
        razorpay_details: RazorpayInfo {
            razorpay_api_key: "rzp_test_key".into(),
            razorpay_api_secret: SecretString::from("rzp_test_secret"),
            razorpay_api_url: options.gateway_url.clone(),
            currency: "INR".into(),
        },
        admin_emails: parse_admin_emails(ADMIN_EMAIL),
        coupon_codes: options.coupon_codes.clone(),
        otp_signin_policy: options.otp_signin_policy,
        free_ticket_policy: options.free_ticket_policy,
    }
}

pub fn spawn_app(options: TestOptions) -> TestApp {
    std::env::set_var("APP_ENV", "test");
    ticketdesk::utility::logging::setup_logging();

    let store = Arc::new(InMemoryStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
    ));

    let state = AppState::new(
        store.clone(),
        test_config(&options),
        mailer.clone(),
        clock.clone(),
    )
    .unwrap();

    let server = TestServer::new(ticketdesk_api::create_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        store,
        mailer,
        clock,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

impl TestApp {
    /// Requests a signup code and returns what the mailer received.
    pub async fn signup_code(&self, email: &str) -> String {
        self.server
            .post("/api/signup/otp/send")
            .json(&json!({ "email": email }))
            .await
            .assert_status(StatusCode::OK);

        self.mailer.last_code_for(email).unwrap()
    }

    /// Full signup flow. Returns (user_id, token).
    pub async fn register(&self, email: &str) -> (Uuid, String) {
        let code = self.signup_code(email).await;
        let body = fixtures::register_body(email, &code);

        let response = self.server.post("/api/signup").json(&body).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        (
            body["user_id"].as_str().unwrap().parse().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    pub async fn admin_token(&self) -> String {
        self.register(ADMIN_EMAIL).await.1
    }

    pub async fn record_paid(
        &self,
        token: &str,
        txn_id: &str,
        amount: i64,
    ) -> axum_test::TestResponse {
        self.server
            .post("/api/transactions")
            .add_header("Authorization", bearer(token))
            .json(&json!({
                "transaction_id": txn_id,
                "ticket_title": "Conference Pass",
                "price": { "kind": "paid", "amount": amount },
                "is_accommodation": false
            }))
            .await
    }

    pub async fn settle(&self, token: &str, txn_id: &str, amount: i64) -> axum_test::TestResponse {
        self.server
            .post("/api/admin/transactions/settle")
            .add_header("Authorization", bearer(token))
            .json(&json!({ "transaction_id": txn_id, "amount": amount }))
            .await
    }

    /// Lets detached notification tasks finish.
    pub async fn drain_notifications(&self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }
}
