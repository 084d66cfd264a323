pub mod export_repository;
pub mod order_repository;
pub mod otp_repository;
pub mod ticket_repository;
pub mod transaction_repository;
pub mod user_repository;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use ticketdesk_primitives::error::ApiError;

pub use export_repository::ExportRepository;
pub use order_repository::OrderRepository;
pub use otp_repository::OtpRepository;
pub use ticket_repository::TicketRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;
type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

pub trait HealthCheck: Send + Sync {
    fn ping(&self) -> Result<(), ApiError>;
}

/// Everything the services need from persistence.
///
/// Every method is a single atomic store operation; services never hold
/// a lock or a connection across calls.
pub trait Store:
    UserRepository
    + OtpRepository
    + OrderRepository
    + TransactionRepository
    + TicketRepository
    + ExportRepository
    + HealthCheck
{
}

impl<T> Store for T where
    T: UserRepository
        + OtpRepository
        + OrderRepository
        + TransactionRepository
        + TicketRepository
        + ExportRepository
        + HealthCheck
{
}

/// Postgres-backed store. Calls block on the r2d2 pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> Result<PgPooled, ApiError> {
        self.pool.get().map_err(ApiError::from)
    }
}

impl HealthCheck for PgStore {
    fn ping(&self) -> Result<(), ApiError> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map(|_| ())
            .map_err(|e| ApiError::DatabaseConnection(e.to_string()))
    }
}

pub(crate) fn is_unique_violation(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}
