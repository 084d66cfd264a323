use super::PgStore;
use diesel::prelude::*;
use ticketdesk_primitives::error::ApiError;
use ticketdesk_primitives::models::dtos::pass_dto::PassHolder;
use ticketdesk_primitives::models::entities::ticket::{
    IssuedTicket, NewPurchasedTicket, PurchasedTicket,
};
use ticketdesk_primitives::schema::{purchased_tickets, users};
use uuid::Uuid;

pub trait TicketRepository: Send + Sync {
    /// Insert-or-ignore keyed on `transaction_id`; a repeat returns the
    /// ticket that already exists.
    fn insert_for_transaction(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
    ) -> Result<IssuedTicket, ApiError>;

    /// Inserts a free grant. With `once_per_user` an existing free ticket of the
    /// same title for the same user is returned instead.
    fn insert_free(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
        once_per_user: bool,
    ) -> Result<IssuedTicket, ApiError>;

    fn tickets_for_user(&self, user_id: Uuid) -> Result<Vec<PurchasedTicket>, ApiError>;

    /// Every issued ticket with its holder, oldest first.
    fn pass_holders(&self) -> Result<Vec<PassHolder>, ApiError>;
}

impl TicketRepository for PgStore {
    fn insert_for_transaction(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
    ) -> Result<IssuedTicket, ApiError> {
        let txn_id = new_ticket
            .transaction_id
            .ok_or_else(|| ApiError::Internal("Paid ticket without transaction".into()))?;
        let mut conn = self.conn()?;

        let inserted = diesel::insert_into(purchased_tickets::table)
            .values(&new_ticket)
            .on_conflict(purchased_tickets::transaction_id)
            .do_nothing()
            .returning(PurchasedTicket::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(|e| ApiError::Database(e.to_string()))?;

        match inserted {
            Some(ticket) => Ok(IssuedTicket {
                ticket,
                newly_issued: true,
            }),
            None => purchased_tickets::table
                .filter(purchased_tickets::transaction_id.eq(txn_id))
                .select(PurchasedTicket::as_select())
                .first(&mut conn)
                .map(|ticket| IssuedTicket {
                    ticket,
                    newly_issued: false,
                })
                .map_err(|e| ApiError::Database(e.to_string())),
        }
    }

    fn insert_free(
        &self,
        new_ticket: NewPurchasedTicket<'_>,
        once_per_user: bool,
    ) -> Result<IssuedTicket, ApiError> {
        let mut conn = self.conn()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            if once_per_user {
                // serialises concurrent grants for the same user
                users::table
                    .find(new_ticket.user_id)
                    .select(users::id)
                    .for_update()
                    .first::<Uuid>(conn)?;

                let existing = purchased_tickets::table
                    .filter(purchased_tickets::user_id.eq(new_ticket.user_id))
                    .filter(purchased_tickets::ticket_title.eq(new_ticket.ticket_title))
                    .filter(purchased_tickets::transaction_id.is_null())
                    .filter(purchased_tickets::price.is_null())
                    .select(PurchasedTicket::as_select())
                    .first(conn)
                    .optional()?;

                if let Some(ticket) = existing {
                    return Ok(IssuedTicket {
                        ticket,
                        newly_issued: false,
                    });
                }
            }

            let ticket = diesel::insert_into(purchased_tickets::table)
                .values(&new_ticket)
                .returning(PurchasedTicket::as_returning())
                .get_result(conn)?;

            Ok(IssuedTicket {
                ticket,
                newly_issued: true,
            })
        })
    }

    fn tickets_for_user(&self, user_id: Uuid) -> Result<Vec<PurchasedTicket>, ApiError> {
        let mut conn = self.conn()?;
        purchased_tickets::table
            .filter(purchased_tickets::user_id.eq(user_id))
            .order(purchased_tickets::created_at.asc())
            .select(PurchasedTicket::as_select())
            .load(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }

    fn pass_holders(&self) -> Result<Vec<PassHolder>, ApiError> {
        let mut conn = self.conn()?;
        purchased_tickets::table
            .inner_join(users::table)
            .order((purchased_tickets::created_at.asc(), purchased_tickets::id.asc()))
            .select((
                purchased_tickets::id,
                users::id,
                users::name,
                users::email,
                purchased_tickets::ticket_title,
                purchased_tickets::created_at,
            ))
            .load::<PassHolder>(&mut conn)
            .map_err(|e| ApiError::Database(e.to_string()))
    }
}
