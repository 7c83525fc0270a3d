//! Mail transport that only writes to the log

use crate::application::mailer::{MailError, Mailer};
use crate::domain::entity::user::User;

/// Logs every message instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send_welcome(&self, user: &User, url: &str) -> Result<(), MailError> {
        tracing::info!(to = %user.email, name = %user.name, url, "Welcome to the Natours Family!");
        Ok(())
    }

    async fn send_password_reset(&self, user: &User, reset_url: &str) -> Result<(), MailError> {
        tracing::info!(
            to = %user.email,
            reset_url,
            "Your password reset token (valid for only 10 minutes)"
        );
        Ok(())
    }
}
