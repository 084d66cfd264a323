use crate::clients::Mailer;
use crate::repositories::Store;
use std::sync::Arc;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::app_state::policies::FreeTicketPolicy;
use ticketdesk_primitives::models::dtos::pass_dto::PassDispatchResponse;
use ticketdesk_primitives::models::entities::ticket::{
    IssuedTicket, NewPurchasedTicket, TicketPrice,
};
use ticketdesk_primitives::models::entities::user::User;
use tracing::{info, warn};
use uuid::Uuid;

pub struct TicketService {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    free_policy: FreeTicketPolicy,
}

impl TicketService {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        free_policy: FreeTicketPolicy,
    ) -> Self {
        Self {
            store,
            mailer,
            free_policy,
        }
    }

    /// Credits the ticket for a settled transaction owned by `user_id`.
    ///
    /// Repeating the call returns the existing ticket with `newly_issued == false`.
    pub fn issue_from_transaction(
        &self,
        user_id: Uuid,
        txn_id: &str,
    ) -> Result<IssuedTicket, ApiError> {
        let tx = self
            .store
            .find_transaction(txn_id)?
            .filter(|tx| tx.verified && tx.user_id == user_id)
            .ok_or_else(|| ApiError::NotFound("No settled transaction for this user".into()))?;

        let user = self.owner(user_id)?;

        let issued = self.store.insert_for_transaction(NewPurchasedTicket {
            user_id,
            transaction_id: Some(&tx.id),
            ticket_title: &tx.ticket_title,
            price: TicketPrice::Paid { amount: tx.amount }.to_column(),
            is_accommodation: tx.is_accommodation,
            coupon: tx.coupon.as_deref(),
        })?;

        if issued.newly_issued {
            info!(%user_id, txn_id, ticket = %issued.ticket.id, "ticket issued");
            self.notify(&user, &issued);
        }
        Ok(issued)
    }

    /// Issues (or returns) the ticket for an already settled transaction,
    /// whoever owns it. Recovers a settle whose issuance step failed.
    pub fn ensure_issued(&self, txn_id: &str) -> Result<IssuedTicket, ApiError> {
        let owner = self
            .store
            .find_transaction(txn_id)?
            .filter(|tx| tx.verified)
            .map(|tx| tx.user_id)
            .ok_or_else(|| ApiError::NotFound("No settled transaction".into()))?;

        let issued = self.issue_from_transaction(owner, txn_id)?;
        if issued.newly_issued {
            warn!(txn_id, "ticket was missing for a settled transaction, issued now");
        }
        Ok(issued)
    }

    pub fn issue_free(
        &self,
        user_id: Uuid,
        ticket_title: &str,
        is_accommodation: bool,
    ) -> Result<IssuedTicket, ApiError> {
        let user = self.owner(user_id)?;

        let issued = self.store.insert_free(
            NewPurchasedTicket {
                user_id,
                transaction_id: None,
                ticket_title,
                price: TicketPrice::Free.to_column(),
                is_accommodation,
                coupon: None,
            },
            self.free_policy == FreeTicketPolicy::OncePerUser,
        )?;

        if issued.newly_issued {
            info!(%user_id, ticket_title, "free ticket granted");
            self.notify(&user, &issued);
        }
        Ok(issued)
    }

    /// Mails an event pass for every issued ticket. A recipient that cannot be
    /// reached is counted and skipped; the rest still go out.
    pub async fn send_passes(&self) -> Result<PassDispatchResponse, ApiError> {
        let holders = self.store.pass_holders()?;
        let mut report = PassDispatchResponse {
            recipients: holders.len(),
            sent: 0,
            failed: 0,
        };

        for holder in &holders {
            match self
                .mailer
                .send_pass(&holder.email, &holder.name, &holder.ticket_title, holder.ticket_id)
                .await
            {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        email = %holder.email,
                        ticket = %holder.ticket_id,
                        error = %e,
                        "pass not delivered"
                    );
                }
            }
        }

        info!(
            recipients = report.recipients,
            sent = report.sent,
            failed = report.failed,
            "passes dispatched"
        );
        Ok(report)
    }

    fn owner(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.store
            .find_user_by_id(user_id)?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))
    }

    /// Fire and forget. A failed confirmation never undoes the credit.
    fn notify(&self, user: &User, issued: &IssuedTicket) {
        let mailer = Arc::clone(&self.mailer);
        let email = user.email.clone();
        let name = user.name.clone();
        let title = issued.ticket.ticket_title.clone();

        tokio::spawn(async move {
            if let Err(e) = mailer.send_ticket_confirmation(&email, &name, &title).await {
                warn!(email = %email, error = %e, "ticket confirmation not delivered");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::Fixture;
    use crate::repositories::TicketRepository;
    use crate::test_support::SentMail;
    use ticketdesk_primitives::models::entities::transaction::SettleOutcome;

    #[tokio::test]
    async fn unsettled_transaction_yields_no_ticket() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;

        let err = fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(fx.store.ticket_count(), 0);
    }

    #[tokio::test]
    async fn only_the_owner_gets_the_ticket() {
        let fx = Fixture::new();
        let owner = fx.user("a@x.com");
        let other = fx.user("b@x.com");
        fx.pending("TXN1", &owner, 500).await;
        fx.ledger.settle("TXN1", 500).unwrap();

        let err = fx.tickets.issue_from_transaction(other.id, "TXN1").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn repeated_issue_returns_same_ticket() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;
        assert_eq!(
            fx.ledger.settle("TXN1", 500).unwrap(),
            SettleOutcome::Verified(user.id)
        );

        let first = fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap();
        let second = fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap();

        assert!(first.newly_issued);
        assert!(!second.newly_issued);
        assert_eq!(first.ticket.id, second.ticket.id);
        assert_eq!(first.ticket.price(), TicketPrice::Paid { amount: 500 });
        assert_eq!(fx.store.ticket_count(), 1);
    }

    #[tokio::test]
    async fn confirmation_is_mailed_once() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;
        fx.ledger.settle("TXN1", 500).unwrap();

        fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap();
        fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap();
        fx.drain_notifications().await;

        let tickets: Vec<_> = fx
            .mailer
            .sent()
            .into_iter()
            .filter(|m| matches!(m, SentMail::Ticket { .. }))
            .collect();
        assert_eq!(tickets.len(), 1);
    }

    #[tokio::test]
    async fn mailer_failure_keeps_the_ticket() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;
        fx.ledger.settle("TXN1", 500).unwrap();
        fx.mailer.fail_all(true);

        let issued = fx.tickets.issue_from_transaction(user.id, "TXN1").unwrap();
        fx.drain_notifications().await;

        assert!(issued.newly_issued);
        assert_eq!(fx.store.ticket_count(), 1);
    }

    #[tokio::test]
    async fn ensure_issued_recovers_a_settle_without_ticket() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;
        fx.ledger.settle("TXN1", 500).unwrap();
        assert_eq!(fx.store.ticket_count(), 0);

        let recovered = fx.tickets.ensure_issued("TXN1").unwrap();
        let again = fx.tickets.ensure_issued("TXN1").unwrap();

        assert!(recovered.newly_issued);
        assert_eq!(recovered.ticket.user_id, user.id);
        assert!(!again.newly_issued);
        assert_eq!(recovered.ticket.id, again.ticket.id);
        assert_eq!(fx.store.ticket_count(), 1);
    }

    #[tokio::test]
    async fn ensure_issued_needs_a_settled_transaction() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");
        fx.pending("TXN1", &user, 500).await;

        assert!(matches!(
            fx.tickets.ensure_issued("TXN1").unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            fx.tickets.ensure_issued("GHOST").unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert_eq!(fx.store.ticket_count(), 0);
    }

    #[tokio::test]
    async fn free_grants_follow_per_request_policy() {
        let fx = Fixture::new();
        let user = fx.user("a@x.com");

        let a = fx.tickets.issue_free(user.id, "Workshop", false).unwrap();
        let b = fx.tickets.issue_free(user.id, "Workshop", false).unwrap();

        assert!(a.newly_issued && b.newly_issued);
        assert_ne!(a.ticket.id, b.ticket.id);
        assert_eq!(a.ticket.price(), TicketPrice::Free);
        assert_eq!(a.ticket.transaction_id, None);
        assert_eq!(fx.store.ticket_count(), 2);
    }

    #[tokio::test]
    async fn free_grants_follow_once_per_user_policy() {
        let fx = Fixture::with_free_policy(FreeTicketPolicy::OncePerUser);
        let user = fx.user("a@x.com");

        let a = fx.tickets.issue_free(user.id, "Workshop", false).unwrap();
        let b = fx.tickets.issue_free(user.id, "Workshop", false).unwrap();
        let other_title = fx.tickets.issue_free(user.id, "Keynote", false).unwrap();

        assert!(a.newly_issued);
        assert!(!b.newly_issued);
        assert_eq!(a.ticket.id, b.ticket.id);
        assert!(other_title.newly_issued);
        assert_eq!(fx.store.ticket_count(), 2);
    }

    #[tokio::test]
    async fn free_grant_for_unknown_user_is_not_found() {
        let fx = Fixture::new();
        let err = fx.tickets.issue_free(Uuid::new_v4(), "Workshop", false).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn passes_go_to_every_ticket_holder() {
        let fx = Fixture::new();
        let a = fx.user("a@x.com");
        let b = fx.user("b@x.com");
        fx.pending("TXN1", &a, 500).await;
        fx.ledger.settle("TXN1", 500).unwrap();
        let paid = fx.tickets.issue_from_transaction(a.id, "TXN1").unwrap();
        let free = fx.tickets.issue_free(b.id, "Workshop", false).unwrap();
        fx.drain_notifications().await;

        let report = fx.tickets.send_passes().await.unwrap();

        assert_eq!(
            report,
            PassDispatchResponse {
                recipients: 2,
                sent: 2,
                failed: 0
            }
        );
        let passes: Vec<_> = fx
            .mailer
            .sent()
            .into_iter()
            .filter_map(|m| match m {
                SentMail::Pass { to, pass_id, .. } => Some((to, pass_id)),
                _ => None,
            })
            .collect();
        assert_eq!(
            passes,
            vec![
                ("a@x.com".to_string(), paid.ticket.id),
                ("b@x.com".to_string(), free.ticket.id),
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_recipient_does_not_stop_the_run() {
        let fx = Fixture::new();
        let a = fx.user("a@x.com");
        let b = fx.user("b@x.com");
        fx.tickets.issue_free(a.id, "Workshop", false).unwrap();
        fx.tickets.issue_free(b.id, "Workshop", false).unwrap();
        fx.drain_notifications().await;
        fx.mailer.reject("a@x.com");

        let report = fx.tickets.send_passes().await.unwrap();

        assert_eq!((report.recipients, report.sent, report.failed), (2, 1, 1));
        assert!(fx.mailer.sent().contains(&SentMail::Pass {
            to: "b@x.com".into(),
            ticket_title: "Workshop".into(),
            pass_id: fx.store.pass_holders().unwrap()[1].ticket_id,
        }));
    }

    #[tokio::test]
    async fn relay_outage_counts_every_pass_as_failed() {
        let fx = Fixture::new();
        let a = fx.user("a@x.com");
        fx.tickets.issue_free(a.id, "Workshop", false).unwrap();
        fx.tickets.issue_free(a.id, "Keynote", false).unwrap();
        fx.drain_notifications().await;
        fx.mailer.fail_all(true);

        let report = fx.tickets.send_passes().await.unwrap();

        assert_eq!((report.recipients, report.sent, report.failed), (2, 0, 2));
        assert_eq!(fx.store.ticket_count(), 2);
    }

    #[tokio::test]
    async fn no_tickets_means_nothing_to_send() {
        let fx = Fixture::new();
        fx.user("a@x.com");

        let report = fx.tickets.send_passes().await.unwrap();

        assert_eq!((report.recipients, report.sent, report.failed), (0, 0, 0));
        assert!(fx.mailer.sent().is_empty());
    }
}
