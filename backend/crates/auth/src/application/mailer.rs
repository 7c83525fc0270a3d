//! Outgoing mail
//!
//! The application only needs two messages; transports live in `infra`.

use thiserror::Error;

use crate::domain::entity::user::User;

#[derive(Debug, Error)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);

#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Sent after signup
    async fn send_welcome(&self, user: &User, url: &str) -> Result<(), MailError>;

    /// Carries the clear reset token inside `reset_url`
    async fn send_password_reset(&self, user: &User, reset_url: &str) -> Result<(), MailError>;
}
