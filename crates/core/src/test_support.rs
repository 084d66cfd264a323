//! Shared test doubles: a settable clock and a recording mailer.

use crate::clients::Mailer;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use std::sync::{Mutex, MutexGuard};
use ticketdesk_primitives::error::ApiError;
use uuid::Uuid;

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMail {
    Otp { to: String, code: String },
    Welcome { to: String },
    Ticket { to: String, ticket_title: String },
    Pass { to: String, ticket_title: String, pass_id: Uuid },
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    failing: Mutex<bool>,
    rejected: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent send fails.
    pub fn fail_all(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    /// Sends addressed to `to` fail; everything else is delivered.
    pub fn reject(&self, to: &str) {
        lock(&self.rejected).push(to.to_string());
    }

    pub fn sent(&self) -> Vec<SentMail> {
        lock(&self.sent).clone()
    }

    /// The most recent code mailed to `to`.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        lock(&self.sent).iter().rev().find_map(|mail| match mail {
            SentMail::Otp { to: addr, code } if addr == to => Some(code.clone()),
            _ => None,
        })
    }

    fn record(&self, mail: SentMail) -> Result<(), ApiError> {
        let to = match &mail {
            SentMail::Otp { to, .. }
            | SentMail::Welcome { to }
            | SentMail::Ticket { to, .. }
            | SentMail::Pass { to, .. } => to,
        };
        if *lock(&self.failing) || lock(&self.rejected).contains(to) {
            return Err(ApiError::Upstream("mail relay unavailable".into()));
        }
        lock(&self.sent).push(mail);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("mailer mutex"),
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_otp(&self, to: &str, code: &str) -> Result<(), ApiError> {
        self.record(SentMail::Otp {
            to: to.to_string(),
            code: code.to_string(),
        })
    }

    async fn send_welcome(&self, to: &str, _name: &str) -> Result<(), ApiError> {
        self.record(SentMail::Welcome { to: to.to_string() })
    }

    async fn send_ticket_confirmation(
        &self,
        to: &str,
        _name: &str,
        ticket_title: &str,
    ) -> Result<(), ApiError> {
        self.record(SentMail::Ticket {
            to: to.to_string(),
            ticket_title: ticket_title.to_string(),
        })
    }

    async fn send_pass(
        &self,
        to: &str,
        _name: &str,
        ticket_title: &str,
        pass_id: Uuid,
    ) -> Result<(), ApiError> {
        self.record(SentMail::Pass {
            to: to.to_string(),
            ticket_title: ticket_title.to_string(),
            pass_id,
        })
    }
}
