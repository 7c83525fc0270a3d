//! User Name Value Object
//!
//! ユーザーの表示名。ログインには使わない（ログインはメールアドレス）。
//!
//! ## 不変条件
//! - NFKC 正規化後、前後の空白を除去
//! - 空文字は不可
//! - 最大 60 文字
//! - 制御文字は不可

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Maximum length for a user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Please tell us your name!")]
    Missing,

    #[error("A name must have at most {USER_NAME_MAX_LENGTH} characters")]
    TooLong,

    #[error("A name must not contain control characters")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let trimmed = normalized.trim();

        if trimmed.is_empty() {
            return Err(UserNameError::Missing);
        }
        if trimmed.chars().count() > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(UserNameError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
