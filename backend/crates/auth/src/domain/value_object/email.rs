//! Email Value Object
//!
//! Represents a validated, lowercased email address. Used as the login
//! identifier, so it is unique per user.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Please provide your email!")]
    Missing,

    #[error("Please provide a valid email address!")]
    Invalid,
}

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailError> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(EmailError::Missing);
        }

        if email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(EmailError::Invalid);
        }

        Ok(Self(email))
    }

    /// Basic email format validation
    fn is_valid_format(email: &str) -> bool {
        // Must contain exactly one @
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if domain.contains('@') {
            return false;
        }

        // Local part checks
        if local.is_empty() || local.len() > 64 || local.chars().any(char::is_whitespace) {
            return false;
        }

        // Domain checks
        if domain.is_empty() || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        // Domain shouldn't start or end with dot or hyphen, nor contain empty labels
        if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) {
            return false;
        }
        !domain.contains("..")
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the domain part of the email
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert_eq!(Email::new(""), Err(EmailError::Missing));
        assert_eq!(Email::new("   "), Err(EmailError::Missing));
        assert_eq!(Email::new("userexample.com"), Err(EmailError::Invalid));
        assert_eq!(Email::new("user@"), Err(EmailError::Invalid));
        assert_eq!(Email::new("@example.com"), Err(EmailError::Invalid));
        assert_eq!(Email::new("user@@example.com"), Err(EmailError::Invalid));
        assert_eq!(Email::new("user@example"), Err(EmailError::Invalid));
        assert_eq!(Email::new("user@example..com"), Err(EmailError::Invalid));
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  Jonas@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jonas@example.com");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EmailError::Missing.to_string(), "Please provide your email!");
        assert_eq!(
            EmailError::Invalid.to_string(),
            "Please provide a valid email address!"
        );
    }
}
