//! In-memory user repository, for tests and database-less development

use chrono::{DateTime, Utc};
use query::{Document, DocumentQuery};
use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId};
use crate::error::{AuthError, AuthResult};

/// Users kept in insertion order behind an async lock
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users, deactivated ones included
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn find_active<'a>(users: &'a [User], pred: impl Fn(&User) -> bool) -> Option<&'a User> {
        users.iter().find(|u| u.active && pred(u))
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail(user.email.to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(Self::find_active(&users, |u| u.user_id == *user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(Self::find_active(&users, |u| u.email == *email).cloned())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(Self::find_active(&users, |u| u.reset_token_matches(token_hash, now)).cloned())
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.user_id != user.user_id && u.email == user.email)
        {
            return Err(AuthError::DuplicateEmail(user.email.to_string()));
        }
        let stored = users
            .iter_mut()
            .find(|u| u.user_id == user.user_id)
            .ok_or(AuthError::UserNotFound)?;
        *stored = user.clone();
        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| !(u.active && u.user_id == *user_id));
        Ok(users.len() != before)
    }

    async fn find_all(&self, query: &DocumentQuery) -> AuthResult<Vec<Document>> {
        let users = self.users.read().await;
        let documents = users
            .iter()
            .filter(|u| u.active)
            .map(User::to_document)
            .collect::<Vec<_>>();
        Ok(query::eval::execute(query, documents))
    }
}
