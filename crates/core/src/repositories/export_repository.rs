use super::PgStore;
use diesel::dsl::{exists, not};
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::export_dto::PendingExportDto;
use ticketdesk_primitives::schema::{pushed_transactions, transactions, users};

pub trait ExportRepository: Send + Sync {
    /// Unverified transactions with no export marker, oldest first.
    fn pending_exports(&self) -> Result<Vec<PendingExportDto>, ApiError>;

    /// Returns how many markers were newly written. Ids with no matching
    /// transaction are skipped.
    fn mark_pushed(&self, transaction_ids: &[String]) -> Result<usize, ApiError>;
}

impl ExportRepository for PgStore {
    fn pending_exports(&self) -> Result<Vec<PendingExportDto>, ApiError> {
        let mut conn = self.conn()?;
        transactions::table
            .inner_join(users::table)
            .filter(transactions::verified.eq(false))
            .filter(not(exists(
                pushed_transactions::table
                    .filter(pushed_transactions::transaction_id.eq(transactions::id)),
            )))
            .order(transactions::created_at.asc())
            .select((
                transactions::id,
                transactions::user_id,
                users::name,
                transactions::amount,
                transactions::ticket_title,
                transactions::is_accommodation,
                transactions::coupon,
                transactions::created_at,
            ))
            .load::<PendingExportDto>(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn mark_pushed(&self, transaction_ids: &[String]) -> Result<usize, ApiError> {
        let mut conn = self.conn()?;
        let known = transactions::table
            .filter(transactions::id.eq_any(transaction_ids))
            .select(transactions::id);

        diesel::insert_into(pushed_transactions::table)
            .values(known)
            .into_columns(pushed_transactions::transaction_id)
            .on_conflict(pushed_transactions::transaction_id)
            .do_nothing()
            .execute(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }
}
