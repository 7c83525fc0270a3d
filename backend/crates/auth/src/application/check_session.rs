//! Check Session Use Case
//!
//! Resolves an access token to the user it was issued for.

use chrono::Utc;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::AccessToken;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

/// Check session use case
pub struct CheckSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CheckSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Verify the token and load its still-valid owner
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NotLoggedIn)?;

        let claims = AccessToken::decode(token, &self.config.token_secret, Utc::now())?;

        let user = self
            .user_repo
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(AuthError::UserGone)?;

        if user.changed_password_after(claims.issued_at) {
            return Err(AuthError::PasswordChanged);
        }

        Ok(user)
    }
}
