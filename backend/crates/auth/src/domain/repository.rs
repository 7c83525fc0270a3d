//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Every lookup ignores deactivated users.

use chrono::{DateTime, Utc};
use query::{Document, DocumentQuery};

use crate::domain::entity::user::User;
use crate::domain::value_object::{Email, UserId};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; a taken email is a `DuplicateEmail` error
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find the user whose pending reset token hashes to `token_hash` and
    /// has not expired at `now`
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<User>>;

    /// Persist every field of `user`
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Remove a user; `false` when there was none
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    /// Public documents of the users selected by `query`
    async fn find_all(&self, query: &DocumentQuery) -> AuthResult<Vec<Document>>;
}
