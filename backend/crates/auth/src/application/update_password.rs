//! Update Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::sign_up::new_password;
use crate::application::token::SessionOutput;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Input of `updateMyPassword`
#[derive(Debug, Default)]
pub struct UpdatePasswordInput {
    pub password_current: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// Update password use case
pub struct UpdatePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> UpdatePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Requires the current password; returns a fresh token since older
    /// ones stop working
    pub async fn execute(&self, mut user: User, input: UpdatePasswordInput) -> AuthResult<SessionOutput> {
        let current = RawPassword::for_verification(input.password_current.unwrap_or_default());
        if !user.password.verify(&current, self.config.pepper()) {
            return Err(AuthError::IncorrectCurrentPassword);
        }

        let mut errors = Vec::new();
        let Some(password) = new_password(input.password, input.password_confirm, &mut errors)
        else {
            return Err(AuthError::Validation(errors));
        };

        user.set_password(UserPassword::from_raw(&password, self.config.pepper())?);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Password updated");

        Ok(SessionOutput::issue(user, &self.config))
    }
}
