//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env` has
//! been loaded). Startup is the only place where configuration errors are
//! fatal, so everything here returns `anyhow::Result`.

use anyhow::{Context, bail};
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use std::env;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TTL_DAYS: u64 = 90;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const TOKEN_SECRET_LEN: usize = 32;

/// `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("development") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub env: AppEnv,
    /// Decoded `TOKEN_SECRET`; `None` means a random per-process secret
    pub token_secret: Option<Vec<u8>>,
    pub token_ttl_days: u64,
    pub cookie_ttl_days: u64,
    pub frontend_origins: Vec<String>,
    pub public_base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let token_secret = match lookup("TOKEN_SECRET") {
            Some(raw) => Some(decode_secret(&raw)?),
            None if cfg!(debug_assertions) => None,
            None => bail!("TOKEN_SECRET must be set in production"),
        };

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            database_url,
            port,
            env: AppEnv::parse(lookup("APP_ENV").as_deref()),
            token_secret,
            token_ttl_days: days(&lookup, "TOKEN_EXPIRES_IN_DAYS")?,
            cookie_ttl_days: days(&lookup, "COOKIE_EXPIRES_IN_DAYS")?,
            frontend_origins,
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}")),
        })
    }

    /// Auth settings derived from this configuration
    pub fn auth_config(&self) -> AuthConfig {
        let mut config = match &self.token_secret {
            Some(secret) => AuthConfig {
                token_secret: secret.clone(),
                ..AuthConfig::default()
            },
            None => AuthConfig::with_random_secret(),
        };
        // Cookies travel over plain HTTP in development
        config.cookie.secure = !self.env.is_development();
        config.public_base_url = self.public_base_url.clone();
        config
            .with_token_ttl_days(self.token_ttl_days)
            .with_cookie_ttl_days(self.cookie_ttl_days)
    }
}

fn days<F>(lookup: &F, key: &str) -> anyhow::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number of days: {raw}")),
        None => Ok(DEFAULT_TTL_DAYS),
    }
}

fn decode_secret(raw: &str) -> anyhow::Result<Vec<u8>> {
    let secret = general_purpose::STANDARD
        .decode(raw.trim())
        .context("TOKEN_SECRET must be base64")?;
    if secret.len() < TOKEN_SECRET_LEN {
        bail!("TOKEN_SECRET must decode to at least {TOKEN_SECRET_LEN} bytes");
    }
    Ok(secret)
}
