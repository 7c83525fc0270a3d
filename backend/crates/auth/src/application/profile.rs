//! Profile Use Case
//!
//! What a logged-in user may do to their own account.

use std::sync::Arc;

use crate::application::sign_up::collect;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserName};
use crate::error::{AuthError, AuthResult};

/// Input of `updateMe`; every other field of the request is ignored
#[derive(Debug, Default)]
pub struct UpdateMeInput {
    pub name: Option<String>,
    pub email: Option<String>,
    /// The request carried `password` or `passwordConfirm`
    pub has_password_fields: bool,
}

/// Profile use case
pub struct ProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ProfileUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn update_me(&self, mut user: User, input: UpdateMeInput) -> AuthResult<User> {
        if input.has_password_fields {
            return Err(AuthError::NotForPasswordUpdates);
        }

        let mut errors = Vec::new();
        let name = input
            .name
            .and_then(|name| collect(UserName::new(name), &mut errors));
        let email = input
            .email
            .and_then(|email| collect(Email::new(email), &mut errors));
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Profile updated");
        Ok(user)
    }

    /// Deactivate the account; it disappears from every lookup
    pub async fn delete_me(&self, mut user: User) -> AuthResult<()> {
        user.deactivate();
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, "Account deactivated");
        Ok(())
    }
}
