//! Sign Up Use Case
//!
//! Creates a new user account and logs it in.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::mailer::Mailer;
use crate::application::token::SessionOutput;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

/// Sign up input; absent fields are reported as validation errors
#[derive(Debug, Default)]
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> SignUpUseCase<U, M>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SessionOutput> {
        let mut errors = Vec::new();

        let name = collect(UserName::new(input.name.unwrap_or_default()), &mut errors);
        let email = collect(Email::new(input.email.unwrap_or_default()), &mut errors);
        let password = new_password(input.password, input.password_confirm, &mut errors);

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AuthError::Validation(errors));
        };

        let password_hash = UserPassword::from_raw(&password, self.config.pepper())?;
        let user = User::new(name, email, password_hash);

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User signed up"
        );

        let profile_url = format!("{}/me", self.config.public_base_url.trim_end_matches('/'));
        if let Err(e) = self.mailer.send_welcome(&user, &profile_url).await {
            tracing::warn!(user_id = %user.user_id, error = %e, "Welcome email not sent");
        }

        Ok(SessionOutput::issue(user, &self.config))
    }
}

/// Keep the value or record the error message
pub(crate) fn collect<T, E: ToString>(result: Result<T, E>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e.to_string());
            None
        }
    }
}

/// Validate a new password and its confirmation
pub(crate) fn new_password(
    password: Option<String>,
    password_confirm: Option<String>,
    errors: &mut Vec<String>,
) -> Option<RawPassword> {
    let password = collect(RawPassword::new(password.unwrap_or_default()), errors);

    let Some(confirm) = password_confirm.filter(|c| !c.is_empty()) else {
        errors.push("Please confirm your password".to_string());
        return None;
    };
    let confirm = RawPassword::for_verification(confirm);

    match password {
        Some(password) if password.matches(&confirm) => Some(password),
        Some(_) => {
            errors.push("Passwords do not match!".to_string());
            None
        }
        None => None,
    }
}
