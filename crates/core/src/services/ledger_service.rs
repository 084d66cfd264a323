use crate::clients::RazorpayClient;
use crate::repositories::Store;
use crate::services::coupon_service::CouponService;
use mockable::Clock;
use std::sync::Arc;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::ledger_dto::InitiatePaymentResponse;
use ticketdesk_primitives::models::entities::order::NewOrder;
use ticketdesk_primitives::models::entities::transaction::{
    NewTransaction, RecordOutcome, SettleOutcome,
};
use tracing::{info, warn};
use uuid::Uuid;

/// A payment attempt as submitted by the client.
#[derive(Debug, Clone)]
pub struct PendingPayment<'a> {
    pub txn_id: &'a str,
    pub user_id: Uuid,
    pub amount: i64,
    pub ticket_title: &'a str,
    pub is_accommodation: bool,
    pub coupon: Option<&'a str>,
}

/// Records payment attempts exactly once and settles them exactly once.
pub struct LedgerService {
    store: Arc<dyn Store>,
    gateway: RazorpayClient,
    coupons: CouponService,
    currency: String,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl LedgerService {
    pub fn new(
        store: Arc<dyn Store>,
        gateway: RazorpayClient,
        coupons: CouponService,
        currency: String,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            store,
            gateway,
            coupons,
            currency,
            clock,
        }
    }

    /// Opens a gateway order and keeps an advisory record of it.
    pub async fn initiate(
        &self,
        user_id: Uuid,
        amount: i64,
    ) -> Result<InitiatePaymentResponse, ApiError> {
        if amount <= 0 {
            return Err(ApiError::BadRequest("Amount must be positive".into()));
        }

        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

        let receipt = format!("order#{}", self.store.count_orders()? + 1);
        let order = self
            .gateway
            .create_order(amount, &self.currency, &receipt)
            .await?;

        self.store.create_order(NewOrder {
            gateway_order_id: &order.id,
            user_id,
            amount,
            receipt: &receipt,
        })?;

        info!(%user_id, order_id = %order.id, amount, "payment order created");

        Ok(InitiatePaymentResponse {
            order_id: order.id,
            receipt,
            amount,
            currency: order.currency,
            name: user.name,
            email: user.email,
            contact_number: user.contact_number,
        })
    }

    /// Records a pending transaction. A second call with the same id writes
    /// nothing and reports `AlreadyExists`.
    pub fn record_pending(&self, payment: PendingPayment<'_>) -> Result<RecordOutcome, ApiError> {
        if payment.amount <= 0 {
            return Err(ApiError::BadRequest("Amount must be positive".into()));
        }
        if payment.txn_id.trim().is_empty() {
            return Err(ApiError::BadRequest("Transaction id is required".into()));
        }
        if let Some(code) = payment.coupon {
            if self.coupons.lookup(code)?.is_none() {
                return Err(ApiError::BadRequest(format!("Unknown coupon: {}", code)));
            }
        }

        let created = self.store.insert_pending(NewTransaction {
            id: payment.txn_id,
            user_id: payment.user_id,
            amount: payment.amount,
            ticket_title: payment.ticket_title,
            is_accommodation: payment.is_accommodation,
            coupon: payment.coupon,
        })?;

        if created {
            info!(txn_id = payment.txn_id, user_id = %payment.user_id, "transaction recorded");
            Ok(RecordOutcome::Created(payment.txn_id.to_string()))
        } else {
            info!(txn_id = payment.txn_id, "transaction already recorded");
            Ok(RecordOutcome::AlreadyExists)
        }
    }

    /// Pending -> settled, at most once per transaction.
    pub fn settle(&self, txn_id: &str, amount: i64) -> Result<SettleOutcome, ApiError> {
        if let Some(tx) = self.store.mark_verified(txn_id, self.clock.utc())? {
            if tx.amount != amount {
                warn!(
                    txn_id,
                    recorded = tx.amount,
                    reported = amount,
                    "settled amount differs from recorded amount"
                );
            }
            info!(txn_id, user_id = %tx.user_id, "transaction settled");
            return Ok(SettleOutcome::Verified(tx.user_id));
        }

        match self.store.find_transaction(txn_id)? {
            Some(_) => Ok(SettleOutcome::AlreadyVerified),
            None => Ok(SettleOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::TransactionRepository;
    use crate::services::fixtures::Fixture;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payment<'a>(txn_id: &'a str, user_id: Uuid) -> PendingPayment<'a> {
        PendingPayment {
            txn_id,
            user_id,
            amount: 500,
            ticket_title: "Conference Pass",
            is_accommodation: false,
            coupon: None,
        }
    }

    #[tokio::test]
    async fn duplicate_record_is_reported_not_written() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");

        assert_eq!(
            fx.ledger.record_pending(payment("TXN1", user.id)).unwrap(),
            RecordOutcome::Created("TXN1".into())
        );
        assert_eq!(
            fx.ledger.record_pending(payment("TXN1", user.id)).unwrap(),
            RecordOutcome::AlreadyExists
        );
        assert_eq!(fx.store.transaction_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_records_leave_one_row() {
        let fx = Arc::new(Fixture::new());
        let user = fx.user("a@x.com");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let fx = Arc::clone(&fx);
                let user_id = user.id;
                tokio::spawn(async move { fx.ledger.record_pending(payment("TXN1", user_id)) })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if let RecordOutcome::Created(_) = handle.await.unwrap().unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(fx.store.transaction_count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_settles_issue_one_ticket() {
        let fx = Arc::new(Fixture::new());
        let user = fx.user("a@x.com");
        fx.ledger.record_pending(payment("TXN1", user.id)).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let fx = Arc::clone(&fx);
                tokio::spawn(async move { fx.ledger.settle("TXN1", 500) })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap().unwrap());
        }

        let winners: Vec<Uuid> = outcomes
            .iter()
            .filter_map(|o| match o {
                SettleOutcome::Verified(owner) => Some(*owner),
                _ => None,
            })
            .collect();
        assert_eq!(winners, vec![user.id]);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| **o == SettleOutcome::AlreadyVerified)
                .count(),
            15
        );

        for owner in winners {
            fx.tickets.issue_from_transaction(owner, "TXN1").unwrap();
        }
        assert_eq!(fx.store.ticket_count(), 1);
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        let mut p = payment("TXN1", user.id);
        p.amount = 0;

        assert!(matches!(
            fx.ledger.record_pending(p),
            Err(ApiError::BadRequest(_))
        ));
        assert_eq!(fx.store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn coupon_must_exist() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");

        let mut unknown = payment("TXN1", user.id);
        unknown.coupon = Some("BOGUS");
        assert!(matches!(
            fx.ledger.record_pending(unknown),
            Err(ApiError::BadRequest(_))
        ));

        let mut known = payment("TXN2", user.id);
        known.coupon = Some("SAVE10");
        assert!(fx.ledger.record_pending(known).is_ok());
    }

    #[tokio::test]
    async fn settle_happens_once() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.ledger.record_pending(payment("TXN1", user.id)).unwrap();

        assert_eq!(
            fx.ledger.settle("TXN1", 500).unwrap(),
            SettleOutcome::Verified(user.id)
        );
        assert_eq!(
            fx.ledger.settle("TXN1", 500).unwrap(),
            SettleOutcome::AlreadyVerified
        );

        let tx = fx.store.find_transaction("TXN1").unwrap().unwrap();
        assert!(tx.verified);
        assert_eq!(tx.verified_at, Some(fx.clock.utc()));
    }

    #[tokio::test]
    async fn settle_unknown_writes_nothing() {
        let fx = Fixture::new();
        assert_eq!(
            fx.ledger.settle("NOPE", 500).unwrap(),
            SettleOutcome::NotFound
        );
        assert_eq!(fx.store.transaction_count(), 0);
    }

    #[tokio::test]
    async fn amount_mismatch_still_settles() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.ledger.record_pending(payment("TXN1", user.id)).unwrap();

        assert_eq!(
            fx.ledger.settle("TXN1", 499).unwrap(),
            SettleOutcome::Verified(user.id)
        );
    }

    #[tokio::test]
    async fn storage_failure_surfaces() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.store.fail_writes(true);

        assert!(matches!(
            fx.ledger.record_pending(payment("TXN1", user.id)),
            Err(ApiError::Database(_))
        ));
    }

    #[tokio::test]
    async fn initiate_numbers_receipts_and_records_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "order_A1",
                "amount": 50000,
                "currency": "INR",
                "receipt": "order#1",
                "status": "created"
            })))
            .mount(&server)
            .await;

        let fx = Fixture::with_gateway(&server.uri());
        let user = fx.user("a@x.com");

        let first = fx.ledger.initiate(user.id, 50000).await.unwrap();
        assert_eq!(first.order_id, "order_A1");
        assert_eq!(first.receipt, "order#1");
        assert_eq!(first.email, "a@x.com");
        assert_eq!(first.contact_number, user.contact_number);

        let second = fx.ledger.initiate(user.id, 50000).await.unwrap();
        assert_eq!(second.receipt, "order#2");
        assert_eq!(fx.store.order_count(), 2);
    }

    #[tokio::test]
    async fn initiate_gateway_failure_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fx = Fixture::with_gateway(&server.uri());
        let user = fx.user("a@x.com");

        let err = fx.ledger.initiate(user.id, 50000).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
        assert_eq!(fx.store.order_count(), 0);
    }
}
