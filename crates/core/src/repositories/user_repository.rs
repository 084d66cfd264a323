use super::{is_unique_violation, PgStore};
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::entities::user::{NewUser, User};
use ticketdesk_primitives::schema::users;
use uuid::Uuid;

pub trait UserRepository: Send + Sync {
    fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Fails with `Conflict` when the email is already registered.
    fn create_user(&self, new_user: NewUser<'_>) -> Result<User, ApiError>;
}

impl UserRepository for PgStore {
    fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, ApiError> {
        let mut conn = self.conn()?;
        users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let mut conn = self.conn()?;
        users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn create_user(&self, new_user: NewUser<'_>) -> Result<User, ApiError> {
        let mut conn = self.conn()?;
        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Email already registered".into())
                } else {
                    ApiError::Database(e.to_string())
                }
            })
    }
}
