use crate::clients::{Mailer, RazorpayClient};
use crate::repositories::Store;
use crate::security::{AdminGate, SecurityConfig};
use crate::services::{
    CouponService, ExportService, LedgerService, OtpService, TicketService, UserService,
};
use eyre::Result;
use mockable::Clock;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
pub use ticketdesk_primitives::models::app_state::app_config::AppConfig;

/// Everything a handler can reach. Built once in the composition root.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Store>,
    pub security: SecurityConfig,
    pub admin: AdminGate,
    pub otp: Arc<OtpService>,
    pub users: UserService,
    pub ledger: LedgerService,
    pub tickets: TicketService,
    pub coupons: CouponService,
    pub exports: ExportService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Arc<Self>> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let razorpay = RazorpayClient::new(
            http,
            &config.razorpay_details.razorpay_api_url,
            config.razorpay_details.razorpay_api_key.clone(),
            config.razorpay_details.razorpay_api_secret.clone(),
        )?;

        let security = SecurityConfig::new(config.jwt_details.clone());
        let coupons = CouponService::new(config.coupon_codes.clone());

        let otp = Arc::new(OtpService::new(
            Arc::clone(&store),
            Arc::clone(&mailer),
            Arc::clone(&clock),
        ));

        Ok(Arc::new(Self {
            admin: AdminGate::new(&config.admin_emails),
            users: UserService::new(
                Arc::clone(&store),
                Arc::clone(&otp),
                security.clone(),
                Arc::clone(&mailer),
                config.otp_signin_policy,
            ),
            ledger: LedgerService::new(
                Arc::clone(&store),
                razorpay,
                coupons.clone(),
                config.razorpay_details.currency.clone(),
                clock,
            ),
            tickets: TicketService::new(Arc::clone(&store), mailer, config.free_ticket_policy),
            exports: ExportService::new(Arc::clone(&store)),
            coupons,
            security,
            otp,
            store,
            config,
        }))
    }
}
