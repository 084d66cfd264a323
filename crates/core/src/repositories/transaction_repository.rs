use super::PgStore;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::entities::transaction::{NewTransaction, Transaction};
use ticketdesk_primitives::schema::transactions;

pub trait TransactionRepository: Send + Sync {
    /// Inserts unless a row with the same id exists. True when a row was written.
    fn insert_pending(&self, new_tx: NewTransaction<'_>) -> Result<bool, ApiError>;

    /// Flips `verified` false -> true. `None` when no unverified row matched.
    fn mark_verified(
        &self,
        id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, ApiError>;

    fn find_transaction(&self, id: &str) -> Result<Option<Transaction>, ApiError>;
}

impl TransactionRepository for PgStore {
    fn insert_pending(&self, new_tx: NewTransaction<'_>) -> Result<bool, ApiError> {
        let mut conn = self.conn()?;
        diesel::insert_into(transactions::table)
            .values(&new_tx)
            .on_conflict(transactions::id)
            .do_nothing()
            .execute(&mut conn)
            .map(|rows| rows == 1)
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn mark_verified(
        &self,
        id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<Option<Transaction>, ApiError> {
        let mut conn = self.conn()?;
        diesel::update(
            transactions::table
                .filter(transactions::id.eq(id))
                .filter(transactions::verified.eq(false)),
        )
        .set((
            transactions::verified.eq(true),
            transactions::verified_at.eq(Some(verified_at)),
        ))
        .returning(Transaction::as_returning())
        .get_result(&mut conn)
        .optional()
        .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn find_transaction(&self, id: &str) -> Result<Option<Transaction>, ApiError> {
        let mut conn = self.conn()?;
        transactions::table
            .find(id)
            .select(Transaction::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| ApiError::Database(e.to_string()))
    }
}
