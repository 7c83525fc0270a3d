//! Sign In Use Case
//!
//! Checks an email/password pair and issues an access token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::SessionOutput;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> AuthResult<SessionOutput> {
        let (Some(email), Some(password)) = (
            email.filter(|e| !e.trim().is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(AuthError::MissingCredentials);
        };

        // A malformed address cannot belong to anyone
        let email = Email::new(&email).map_err(|_| AuthError::IncorrectCredentials)?;
        let password = RawPassword::for_verification(password);

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::IncorrectCredentials)?;

        if !user.password.verify(&password, self.config.pepper()) {
            return Err(AuthError::IncorrectCredentials);
        }

        tracing::info!(user_id = %user.user_id, "User signed in");

        Ok(SessionOutput::issue(user, &self.config))
    }
}
