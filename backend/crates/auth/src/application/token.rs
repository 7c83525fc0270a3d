//! Access Tokens
//!
//! Stateless, HMAC-SHA256 signed: `<userId>.<iat>.<exp>.<signature>` where
//! `iat`/`exp` are seconds since the epoch and the signature is the
//! unpadded base64url MAC of everything before the last dot.

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use std::time::Duration;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessToken {
    pub user_id: UserId,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl AccessToken {
    pub fn issue(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = now.timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            user_id,
            issued_at,
            expires_at: issued_at.saturating_add(ttl),
        }
    }

    pub fn encode(&self, secret: &[u8]) -> String {
        let payload = format!("{}.{}.{}", self.user_id, self.issued_at, self.expires_at);
        let signature = to_base64url(&hmac_sha256(secret, payload.as_bytes()));
        format!("{payload}.{signature}")
    }

    /// Verify the signature first, then the expiry
    pub fn decode(token: &str, secret: &[u8], now: DateTime<Utc>) -> AuthResult<Self> {
        let (payload, signature) = token.rsplit_once('.').ok_or(AuthError::InvalidToken)?;
        let signature = from_base64url(signature).map_err(|_| AuthError::InvalidToken)?;
        if !verify_hmac_sha256(secret, payload.as_bytes(), &signature) {
            return Err(AuthError::InvalidToken);
        }

        let mut parts = payload.split('.');
        let (Some(id), Some(iat), Some(exp), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::InvalidToken);
        };

        let token = Self {
            user_id: id.parse().map_err(|_| AuthError::InvalidToken)?,
            issued_at: iat.parse().map_err(|_| AuthError::InvalidToken)?,
            expires_at: exp.parse().map_err(|_| AuthError::InvalidToken)?,
        };

        if token.expires_at <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(token)
    }
}

/// A user together with a freshly signed token, as returned by every
/// operation that logs the user in
#[derive(Debug, Clone)]
pub struct SessionOutput {
    pub user: User,
    pub token: String,
}

impl SessionOutput {
    pub fn issue(user: User, config: &AuthConfig) -> Self {
        let token = AccessToken::issue(user.user_id, Utc::now(), config.token_ttl)
            .encode(&config.token_secret);
        Self { user, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"a-test-secret-of-reasonable-size";

    #[test]
    fn test_encode_decode() {
        let now = Utc::now();
        let token = AccessToken::issue(UserId::new(), now, Duration::from_secs(3600));
        let encoded = token.encode(SECRET);

        assert_eq!(encoded.split('.').count(), 4);
        assert_eq!(AccessToken::decode(&encoded, SECRET, now).unwrap(), token);
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let token = AccessToken::issue(UserId::new(), now, Duration::from_secs(60)).encode(SECRET);
        let later = now + chrono::Duration::seconds(61);

        assert!(matches!(
            AccessToken::decode(&token, SECRET, later),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_token() {
        let now = Utc::now();
        let token = AccessToken::issue(UserId::new(), now, Duration::from_secs(60));
        let encoded = token.encode(SECRET);

        // Extend the expiry without re-signing
        let forged = encoded.replacen(
            &format!(".{}.", token.expires_at),
            &format!(".{}.", token.expires_at + 3600),
            1,
        );
        assert!(matches!(
            AccessToken::decode(&forged, SECRET, now),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            AccessToken::decode(&encoded, b"another-secret", now),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token() {
        let now = Utc::now();
        for garbage in ["", "loggedOut", "a.b", "a.b.c.d.e", "x.1.2.!!!"] {
            assert!(matches!(
                AccessToken::decode(garbage, SECRET, now),
                Err(AuthError::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_well_signed_but_malformed_payload() {
        let payload = "not-a-uuid.1.2";
        let token = format!(
            "{payload}.{}",
            to_base64url(&hmac_sha256(SECRET, payload.as_bytes()))
        );
        assert!(matches!(
            AccessToken::decode(&token, SECRET, Utc::now()),
            Err(AuthError::InvalidToken)
        ));
    }
}
