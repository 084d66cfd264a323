use super::PgStore;
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::entities::order::{NewOrder, Order};
use ticketdesk_primitives::schema::orders;

pub trait OrderRepository: Send + Sync {
    fn count_orders(&self) -> Result<i64, ApiError>;

    fn create_order(&self, new_order: NewOrder<'_>) -> Result<Order, ApiError>;
}

impl OrderRepository for PgStore {
    fn count_orders(&self) -> Result<i64, ApiError> {
        let mut conn = self.conn()?;
        orders::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn create_order(&self, new_order: NewOrder<'_>) -> Result<Order, ApiError> {
        let mut conn = self.conn()?;
        diesel::insert_into(orders::table)
            .values(&new_order)
            .returning(Order::as_returning())
            .get_result(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }
}
