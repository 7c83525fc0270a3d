//! Password Reset Use Case
//!
//! `forgotPassword` mails a one-time link; `resetPassword` redeems it.

use chrono::Utc;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::mailer::Mailer;
use crate::application::sign_up::new_password;
use crate::application::token::SessionOutput;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Password reset use case
pub struct PasswordResetUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> PasswordResetUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    /// Store a reset token for the account and mail the link
    pub async fn forgot(&self, email: Option<String>) -> AuthResult<()> {
        let email = email
            .and_then(|e| Email::new(e).ok())
            .ok_or(AuthError::NoUserWithEmail)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NoUserWithEmail)?;

        let token = user.create_password_reset_token(self.config.reset_token_ttl());
        self.user_repo.update(&user).await?;

        let reset_url = self.config.reset_url(&token);
        if let Err(e) = self.mailer.send_password_reset(&user, &reset_url).await {
            tracing::error!(user_id = %user.user_id, error = %e, "Password reset email failed");
            user.clear_password_reset_token();
            self.user_repo.update(&user).await?;
            return Err(AuthError::EmailDelivery);
        }

        tracing::info!(user_id = %user.user_id, "Password reset token sent");
        Ok(())
    }

    /// Redeem a reset token: set the new password and log the user in
    pub async fn reset(
        &self,
        token: &str,
        password: Option<String>,
        password_confirm: Option<String>,
    ) -> AuthResult<SessionOutput> {
        let token_hash = platform::crypto::sha256_hex(token.as_bytes());

        let mut user = self
            .user_repo
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
            .ok_or(AuthError::ResetTokenInvalid)?;

        let mut errors = Vec::new();
        let Some(password) = new_password(password, password_confirm, &mut errors) else {
            return Err(AuthError::Validation(errors));
        };

        user.set_password(UserPassword::from_raw(&password, self.config.pepper())?);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password reset");

        Ok(SessionOutput::issue(user, &self.config))
    }
}
