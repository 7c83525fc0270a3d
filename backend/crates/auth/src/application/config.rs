//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Re-export cookie settings from platform
pub use platform::cookie::{CookieConfig, SameSite};

const DAY_SECS: u64 = 24 * 3600;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 key for access tokens
    pub token_secret: Vec<u8>,
    /// Access token lifetime (90 days)
    pub token_ttl: Duration,
    /// `jwt` cookie settings
    pub cookie: CookieConfig,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Password reset token lifetime (10 minutes)
    pub reset_token_ttl: Duration,
    /// Origin used to build the links sent by mail
    pub public_base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: vec![0u8; 32],
            token_ttl: Duration::from_secs(90 * DAY_SECS),
            cookie: CookieConfig {
                max_age_secs: Some((90 * DAY_SECS) as i64),
                ..CookieConfig::default()
            },
            password_pepper: None,
            reset_token_ttl: Duration::from_secs(10 * 60),
            public_base_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        let mut config = Self::with_random_secret();
        config.cookie.secure = false;
        config
    }

    /// Token lifetime in days
    pub fn with_token_ttl_days(mut self, days: u64) -> Self {
        self.token_ttl = Duration::from_secs(days * DAY_SECS);
        self
    }

    /// Cookie lifetime in days
    pub fn with_cookie_ttl_days(mut self, days: u64) -> Self {
        self.cookie.max_age_secs = Some((days * DAY_SECS) as i64);
        self
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Reset token lifetime as a chrono duration
    pub fn reset_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.reset_token_ttl).unwrap_or(chrono::Duration::minutes(10))
    }

    /// Link mailed by `forgotPassword`
    pub fn reset_url(&self, token: &str) -> String {
        format!(
            "{}/api/v1/users/resetPassword/{token}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}
