//! User Entity
//!
//! A registered account: profile, role, password hash and the state of an
//! in-flight password reset.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use query::Document;
use serde_json::Value;

use crate::domain::value_object::{Email, UserId, UserName, UserPassword, UserRole};

/// Photo assigned to accounts that never uploaded one
pub const DEFAULT_PHOTO: &str = "default.jpg";

/// Random bytes in a password reset token (64 hex characters)
pub const RESET_TOKEN_BYTES: usize = 32;

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: UserName,
    /// Login identifier, unique
    pub email: Email,
    pub photo: String,
    pub user_role: UserRole,
    pub password: UserPassword,
    /// Set whenever the password of an existing account changes
    pub password_changed_at: Option<DateTime<Utc>>,
    /// SHA-256 hex of the reset token; the clear token only travels by mail
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,
    /// Deactivated accounts are invisible to every lookup
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default role and photo
    pub fn new(name: UserName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            photo: DEFAULT_PHOTO.to_string(),
            user_role: UserRole::default(),
            password,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password and invalidate older tokens.
    ///
    /// The change is stamped one second in the past so that a token issued
    /// right after this call is not considered older than the change.
    pub fn set_password(&mut self, password: UserPassword) {
        let now = Utc::now();
        self.password = password;
        self.password_changed_at = Some(now - Duration::seconds(1));
        self.clear_password_reset_token();
        self.updated_at = now;
    }

    /// Whether the password changed after a token issued at `issued_at`
    /// (seconds since the epoch)
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| changed.timestamp() > issued_at)
    }

    /// Start a password reset: store the token hash and expiry, return the
    /// clear token for delivery
    pub fn create_password_reset_token(&mut self, ttl: Duration) -> String {
        let token = platform::crypto::random_hex_token(RESET_TOKEN_BYTES);
        self.password_reset_token = Some(platform::crypto::sha256_hex(token.as_bytes()));
        self.password_reset_expires = Some(Utc::now() + ttl);
        token
    }

    pub fn clear_password_reset_token(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires = None;
    }

    /// Whether `token_hash` is the pending reset token and still valid at `now`
    pub fn reset_token_matches(&self, token_hash: &str, now: DateTime<Utc>) -> bool {
        match (&self.password_reset_token, self.password_reset_expires) {
            (Some(stored), Some(expires)) => stored == token_hash && expires > now,
            _ => false,
        }
    }

    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.user_role = role;
        self.updated_at = Utc::now();
    }

    pub fn set_photo(&mut self, photo: impl Into<String>) {
        self.photo = photo.into();
        self.updated_at = Utc::now();
    }

    /// Soft delete
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Public representation; password and reset state never leave the entity
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".into(), Value::String(self.user_id.to_string()));
        doc.insert("name".into(), Value::String(self.name.to_string()));
        doc.insert("email".into(), Value::String(self.email.to_string()));
        doc.insert("photo".into(), Value::String(self.photo.clone()));
        doc.insert("role".into(), Value::String(self.user_role.code().to_string()));
        doc.insert(
            "createdAt".into(),
            Value::String(self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RawPassword;

    fn sample_user() -> User {
        let raw = RawPassword::new("pass1234".to_string()).unwrap();
        User::new(
            UserName::new("Laura Wilson").unwrap(),
            Email::new("laura@example.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = sample_user();
        assert_eq!(user.photo, DEFAULT_PHOTO);
        assert_eq!(user.user_role, UserRole::User);
        assert!(user.active);
        assert!(user.password_changed_at.is_none());
        assert!(!user.changed_password_after(0));
    }

    #[test]
    fn test_set_password_invalidates_older_tokens() {
        let mut user = sample_user();
        let issued_before = Utc::now().timestamp() - 60;

        let raw = RawPassword::new("newpass123".to_string()).unwrap();
        user.set_password(UserPassword::from_raw(&raw, None).unwrap());

        assert!(user.changed_password_after(issued_before));
        // A token issued now is still accepted
        assert!(!user.changed_password_after(Utc::now().timestamp()));
        assert!(user.password.verify(&raw, None));
    }

    #[test]
    fn test_password_reset_token() {
        let mut user = sample_user();
        let token = user.create_password_reset_token(Duration::minutes(10));

        assert_eq!(token.len(), RESET_TOKEN_BYTES * 2);
        let hash = platform::crypto::sha256_hex(token.as_bytes());
        assert_eq!(user.password_reset_token.as_deref(), Some(hash.as_str()));
        assert!(user.reset_token_matches(&hash, Utc::now()));
        assert!(!user.reset_token_matches(&hash, Utc::now() + Duration::minutes(11)));
        assert!(!user.reset_token_matches(&token, Utc::now()));

        user.clear_password_reset_token();
        assert!(!user.reset_token_matches(&hash, Utc::now()));
    }

    #[test]
    fn test_to_document_hides_secrets() {
        let user = sample_user();
        let doc = user.to_document();

        assert_eq!(doc["name"], "Laura Wilson");
        assert_eq!(doc["email"], "laura@example.com");
        assert_eq!(doc["role"], "user");
        assert_eq!(doc["photo"], "default.jpg");
        assert!(doc["createdAt"].as_str().unwrap().ends_with('Z'));
        assert!(!doc.contains_key("password"));
        assert!(!doc.contains_key("passwordResetToken"));
    }
}
