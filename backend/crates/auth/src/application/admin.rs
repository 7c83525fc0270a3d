//! User administration
//!
//! Admin-only CRUD over accounts. Creating accounts goes through signup.

use query::{ApiFeatures, Document, DocumentQuery, RawQueryParams};
use std::sync::Arc;

use crate::application::sign_up::collect;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId, UserName, UserRole};
use crate::error::{AuthError, AuthResult};

/// Fields an admin may change
#[derive(Debug, Default)]
pub struct AdminUpdateInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub photo: Option<String>,
}

/// User administration use case
pub struct UserAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UserAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Filtered, sorted, projected and paginated list
    pub async fn list(&self, params: RawQueryParams) -> AuthResult<Vec<Document>> {
        let query = ApiFeatures::apply_all(DocumentQuery::new(), params);
        self.user_repo.find_all(&query).await
    }

    pub async fn get(&self, id: &str) -> AuthResult<User> {
        let user_id: UserId = id.parse()?;
        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn update(&self, id: &str, input: AdminUpdateInput) -> AuthResult<User> {
        let mut user = self.get(id).await?;

        let mut errors = Vec::new();
        let name = input
            .name
            .and_then(|name| collect(UserName::new(name), &mut errors));
        let email = input
            .email
            .and_then(|email| collect(Email::new(email), &mut errors));
        let role = input.role.and_then(|code| {
            let role = UserRole::from_code(&code);
            if role.is_none() {
                errors.push("Role is either: user, guide, lead-guide, admin".to_string());
            }
            role
        });
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        if let Some(name) = name {
            user.set_name(name);
        }
        if let Some(email) = email {
            user.set_email(email);
        }
        if let Some(role) = role {
            user.set_role(role);
        }
        if let Some(photo) = input.photo.filter(|p| !p.trim().is_empty()) {
            user.set_photo(photo.trim());
        }
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.user_id, role = %user.user_role, "User updated by admin");
        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> AuthResult<()> {
        let user_id: UserId = id.parse()?;
        if !self.user_repo.delete(&user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "User deleted by admin");
        Ok(())
    }
}
