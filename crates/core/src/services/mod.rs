pub mod coupon_service;
pub mod export_service;
pub mod ledger_service;
pub mod otp_service;
pub mod ticket_service;
pub mod user_service;

pub use coupon_service::{Coupon, CouponOutcome, CouponService};
pub use export_service::ExportService;
pub use ledger_service::{LedgerService, PendingPayment};
pub use otp_service::OtpService;
pub use ticket_service::TicketService;
pub use user_service::UserService;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::clients::RazorpayClient;
    use crate::repositories::memory::InMemoryStore;
    use crate::repositories::{Store, UserRepository};
    use crate::security::SecurityConfig;
    use crate::test_support::{MutableClock, RecordingMailer};
    use chrono::{TimeZone, Utc};
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Arc;
    use ticketdesk_primitives::models::app_state::jwt_details::JWTInfo;
    use ticketdesk_primitives::models::app_state::policies::{FreeTicketPolicy, OtpSigninPolicy};
    use ticketdesk_primitives::models::entities::user::{NewUser, User};

    pub struct Fixture {
        pub store: Arc<InMemoryStore>,
        pub clock: Arc<MutableClock>,
        pub mailer: Arc<RecordingMailer>,
        pub security: SecurityConfig,
        pub otp: Arc<OtpService>,
        pub users: UserService,
        pub ledger: LedgerService,
        pub tickets: TicketService,
        pub exports: ExportService,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self::build(
                "http://127.0.0.1:9",
                OtpSigninPolicy::default(),
                FreeTicketPolicy::default(),
            )
        }

        pub fn with_gateway(base_url: &str) -> Self {
            Self::build(
                base_url,
                OtpSigninPolicy::default(),
                FreeTicketPolicy::default(),
            )
        }

        pub fn with_signin_policy(policy: OtpSigninPolicy) -> Self {
            Self::build("http://127.0.0.1:9", policy, FreeTicketPolicy::default())
        }

        pub fn with_free_policy(policy: FreeTicketPolicy) -> Self {
            Self::build("http://127.0.0.1:9", OtpSigninPolicy::default(), policy)
        }

        fn build(gateway_url: &str, signin: OtpSigninPolicy, free: FreeTicketPolicy) -> Self {
            let store = Arc::new(InMemoryStore::new());
            let clock = Arc::new(MutableClock::new(
                Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap(),
            ));
            let mailer = Arc::new(RecordingMailer::new());
            let dyn_store: Arc<dyn Store> = store.clone();

            let security = SecurityConfig::new(
                JWTInfo::from_parts(
                    "fixture-secret-that-is-long-enough-123".into(),
                    "ticketdesk".into(),
                    "ticketdesk_api".into(),
                )
                .unwrap(),
            );
            let gateway = RazorpayClient::new(
                reqwest::Client::new(),
                gateway_url,
                "rzp_test".into(),
                SecretString::new("rzp_secret".into()),
            )
            .unwrap();

            let otp = Arc::new(OtpService::new(
                dyn_store.clone(),
                mailer.clone(),
                clock.clone(),
            ));

            Self {
                users: UserService::new(
                    dyn_store.clone(),
                    otp.clone(),
                    security.clone(),
                    mailer.clone(),
                    signin,
                ),
                ledger: LedgerService::new(
                    dyn_store.clone(),
                    gateway,
                    CouponService::new("SAVE10:10;500"),
                    "INR".into(),
                    clock.clone(),
                ),
                tickets: TicketService::new(dyn_store.clone(), mailer.clone(), free),
                exports: ExportService::new(dyn_store),
                store,
                clock,
                mailer,
                security,
                otp,
            }
        }

        pub fn user(&self, email: &str) -> User {
            self.store
                .create_user(NewUser {
                    email,
                    name: "Test User",
                    contact_number: "9876543210",
                    profile_data: json!({}),
                })
                .unwrap()
        }

        pub async fn pending(&self, txn_id: &str, user: &User, amount: i64) {
            self.ledger
                .record_pending(PendingPayment {
                    txn_id,
                    user_id: user.id,
                    amount,
                    ticket_title: "Conference Pass",
                    is_accommodation: false,
                    coupon: None,
                })
                .unwrap();
        }

        /// Lets detached notification tasks run to completion.
        pub async fn drain_notifications(&self) {
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        }
    }
}
