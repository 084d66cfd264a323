use async_trait::async_trait;
use ticketdesk_primitives::error::ApiError;
use uuid::Uuid;

/// Outbound notifications. Rendering and SMTP delivery live behind this port.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), ApiError>;

    async fn send_welcome(&self, to: &str, name: &str) -> Result<(), ApiError>;

    async fn send_ticket_confirmation(
        &self,
        to: &str,
        name: &str,
        ticket_title: &str,
    ) -> Result<(), ApiError>;

    /// The event pass for one issued ticket, identified by `pass_id`.
    async fn send_pass(
        &self,
        to: &str,
        name: &str,
        ticket_title: &str,
        pass_id: Uuid,
    ) -> Result<(), ApiError>;
}

/// Writes each message to the log instead of delivering it.
#[derive(Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, to: &str, _code: &str) -> Result<(), ApiError> {
        tracing::info!(to, subject = "Your verification code", "Sending email");
        Ok(())
    }

    async fn send_welcome(&self, to: &str, name: &str) -> Result<(), ApiError> {
        tracing::info!(to, name, subject = "Welcome", "Sending email");
        Ok(())
    }

    async fn send_ticket_confirmation(
        &self,
        to: &str,
        name: &str,
        ticket_title: &str,
    ) -> Result<(), ApiError> {
        tracing::info!(to, name, ticket_title, subject = "Your ticket", "Sending email");
        Ok(())
    }

    async fn send_pass(
        &self,
        to: &str,
        name: &str,
        ticket_title: &str,
        pass_id: Uuid,
    ) -> Result<(), ApiError> {
        tracing::info!(to, name, ticket_title, %pass_id, subject = "Your event pass", "Sending email");
        Ok(())
    }
}
