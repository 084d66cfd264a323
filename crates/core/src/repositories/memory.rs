//! In-memory store for tests.
//!
//! All tables sit behind one mutex, so each trait method is atomic in the
//! same way the corresponding single SQL statement is.

use super::{
    ExportRepository, HealthCheck, OrderRepository, OtpRepository, TicketRepository,
    TransactionRepository, UserRepository,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::export_dto::PendingExportDto;
use ticketdesk_primitives::models::dtos::pass_dto::PassHolder;
use ticketdesk_primitives::models::entities::order::{NewOrder, Order};
use ticketdesk_primitives::models::entities::otp::OtpRecord;
use ticketdesk_primitives::models::entities::ticket::{
    IssuedTicket, NewPurchasedTicket, PurchasedTicket,
};
use ticketdesk_primitives::models::entities::transaction::{NewTransaction, Transaction};
use ticketdesk_primitives::models::entities::user::{NewUser, User};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    otps: HashMap<String, OtpRecord>,
    orders: Vec<Order>,
    transactions: HashMap<String, Transaction>,
    tickets: Vec<PurchasedTicket>,
    pushed: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    fail_writes: Mutex<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        *lock(&self.fail_writes) = fail;
    }

    pub fn transaction_count(&self) -> usize {
        self.tables().transactions.len()
    }

    pub fn ticket_count(&self) -> usize {
        self.tables().tickets.len()
    }

    pub fn order_count(&self) -> usize {
        self.tables().orders.len()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.tables)
    }

    fn writable(&self) -> Result<MutexGuard<'_, Tables>, ApiError> {
        if *lock(&self.fail_writes) {
            return Err(ApiError::Database("write rejected".into()));
        }
        Ok(self.tables())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl HealthCheck for InMemoryStore {
    fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

impl UserRepository for InMemoryStore {
    fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        Ok(self.tables().users.get(&user_id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn create_user(&self, new_user: NewUser<'_>) -> Result<User, ApiError> {
        let mut tables = self.writable()?;
        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(ApiError::Conflict("Email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.to_string(),
            name: new_user.name.to_string(),
            contact_number: new_user.contact_number.to_string(),
            profile_data: new_user.profile_data,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

impl OtpRepository for InMemoryStore {
    fn upsert_otp(
        &self,
        email: &str,
        code_hash: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        self.writable()?.otps.insert(
            email.to_string(),
            OtpRecord {
                email: email.to_string(),
                code_hash: code_hash.to_string(),
                issued_at,
                consumed: false,
            },
        );
        Ok(())
    }

    fn find_otp(&self, email: &str) -> Result<Option<OtpRecord>, ApiError> {
        Ok(self.tables().otps.get(email).cloned())
    }

    fn consume_if_live(
        &self,
        email: &str,
        code_hash: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let mut tables = self.writable()?;
        Ok(match tables.otps.get_mut(email) {
            Some(record)
                if record.code_hash == code_hash
                    && !record.consumed
                    && record.issued_at >= issued_after =>
            {
                record.consumed = true;
                true
            }
            _ => false,
        })
    }
}

impl OrderRepository for InMemoryStore {
    fn count_orders(&self) -> Result<i64, ApiError> {
        Ok(self.tables().orders.len() as i64)
    }

    fn create_order(&self, new_order: NewOrder<'_>) -> Result<Order, ApiError> {
        let order = Order {
            id: Uuid::new_v4(),
            gateway_order_id: new_order.gateway_order_id.to_string(),
            user_id: new_order.user_id,
            amount: new_order.amount,
            receipt: new_order.receipt.to_string(),
            created_at: Utc::now(),
        };
        self.writable()?.orders.push(order.clone());
        Ok(order)
    }
}

impl TransactionRepository for InMemoryStore {
    fn insert_pending(&self, new_tx: NewTransaction<'_>) -> Result<bool, ApiError> {
        let mut tables = self.writable()?;
        if tables.transactions.contains_key(new_tx.id) {
            return Ok(false);
        }
        if !tables.users.contains_key(&new_tx.user_id) {
            return Err(ApiError::Database(
                "transactions_user_id_fkey violated".into(),
            ));
        }
        tables.transactions.insert(
            new_tx.id.to_string(),
            Transaction {
                id: new_tx.id.to_string(),
                user_id: new_tx.user_id,
                amount: new_tx.amount,
                ticket_title: new_tx.ticket_title.to_string(),
                is_accommodation: new_tx.is_accommodation,
                coupon: new_tx.coupon.map(str::to_string),
                verified: false,
                created_at: Utc::now(),
                verified_at: None,
            },
        );
        Ok(true)
    }

    fn mark_verified(
        &self,
        id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, ApiError> {
        let mut tables = self.writable()?;
        Ok(match tables.transactions.get_mut(id) {
            Some(tx) if !tx.verified => {
                tx.verified = true;
                tx.verified_at = Some(verified_at);
                Some(tx.clone())
            }
            _ => None,
        })
    }

    fn find_transaction(&self, id: &str) -> Result<Option<Transaction>, ApiError> {
        Ok(self.tables().transactions.get(id).cloned())
    }
}

fn materialize(new_ticket: &NewPurchasedTicket<'_>) -> PurchasedTicket {
    PurchasedTicket {
        id: Uuid::new_v4(),
        user_id: new_ticket.user_id,
        transaction_id: new_ticket.transaction_id.map(str::to_string),
        ticket_title: new_ticket.ticket_title.to_string(),
        price: new_ticket.price,
        is_accommodation: new_ticket.is_accommodation,
        coupon: new_ticket.coupon.map(str::to_string),
        created_at: Utc::now(),
    }
}

impl TicketRepository for InMemoryStore {
    fn insert_for_transaction(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
    ) -> Result<IssuedTicket, ApiError> {
        let txn_id = new_ticket
            .transaction_id
            .ok_or_else(|| ApiError::Internal("Paid ticket without transaction".into()))?;
        let mut tables = self.writable()?;
        let existing = tables
            .tickets
            .iter()
            .find(|t| t.transaction_id.as_deref() == Some(txn_id))
            .cloned();

        if let Some(ticket) = existing {
            return Ok(IssuedTicket {
                ticket,
                newly_issued: false,
            });
        }

        let ticket = materialize(&new_ticket);
        tables.tickets.push(ticket.clone());
        Ok(IssuedTicket {
            ticket,
            newly_issued: true,
        })
    }

    fn insert_free(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
        once_per_user: bool,
    ) -> Result<IssuedTicket, ApiError> {
        let mut tables = self.writable()?;
        if !tables.users.contains_key(&new_ticket.user_id) {
            return Err(ApiError::NotFound("Record not found".into()));
        }

        if once_per_user {
            let existing = tables
                .tickets
                .iter()
                .find(|t| {
                    t.user_id == new_ticket.user_id
                        && t.ticket_title == new_ticket.ticket_title
                        && t.transaction_id.is_none()
                        && t.price.is_none()
                })
                .cloned();

            if let Some(ticket) = existing {
                return Ok(IssuedTicket {
                    ticket,
                    newly_issued: false,
                });
            }
        }

        let ticket = materialize(&new_ticket);
        tables.tickets.push(ticket.clone());
        Ok(IssuedTicket {
            ticket,
            newly_issued: true,
        })
    }

    fn tickets_for_user(&self, user_id: Uuid) -> Result<Vec<PurchasedTicket>, ApiError> {
        Ok(self
            .tables()
            .tickets
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn pass_holders(&self) -> Result<Vec<PassHolder>, ApiError> {
        let tables = self.tables();
        Ok(tables
            .tickets
            .iter()
            .filter_map(|t| {
                tables.users.get(&t.user_id).map(|u| PassHolder {
                    ticket_id: t.id,
                    user_id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    ticket_title: t.ticket_title.clone(),
                    issued_at: t.created_at,
                })
            })
            .collect())
    }
}

impl ExportRepository for InMemoryStore {
    fn pending_exports(&self) -> Result<Vec<PendingExportDto>, ApiError> {
        let tables = self.tables();
        let mut pending: Vec<PendingExportDto> = tables
            .transactions
            .values()
            .filter(|tx| !tx.verified && !tables.pushed.contains(&tx.id))
            .filter_map(|tx| {
                tables.users.get(&tx.user_id).map(|user| PendingExportDto {
                    transaction_id: tx.id.clone(),
                    user_id: tx.user_id,
                    name: user.name.clone(),
                    amount: tx.amount,
                    ticket_title: tx.ticket_title.clone(),
                    is_accommodation: tx.is_accommodation,
                    coupon: tx.coupon.clone(),
                    created_at: tx.created_at,
                })
            })
            .collect();
        pending.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.transaction_id.cmp(&b.transaction_id))
        });
        Ok(pending)
    }

    fn mark_pushed(&self, transaction_ids: &[String]) -> Result<usize, ApiError> {
        let mut tables = self.writable()?;
        let Tables {
            transactions,
            pushed,
            ..
        } = &mut *tables;
        Ok(transaction_ids
            .iter()
            .filter(|id| transactions.contains_key(id.as_str()))
            .filter(|id| pushed.insert((*id).clone()))
            .count())
    }
}
