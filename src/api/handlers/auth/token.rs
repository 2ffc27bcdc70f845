//! HS256 access tokens.
//!
//! The token only carries the account id; role and favorites are re-read from
//! the store on every request so admin changes apply immediately.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::error::ApiError;

pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
/// Ten years; longer lifetimes are clamped.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signing material and lifetime for access tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: SecretString,
    ttl_days: i64,
}

impl TokenConfig {
    #[must_use]
    pub fn new(secret: SecretString, ttl_days: i64) -> Self {
        Self {
            secret,
            ttl_days: ttl_days.clamp(1, MAX_TOKEN_TTL_DAYS),
        }
    }

    /// Issues a token for `user_id` that expires after the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
        let now = Utc::now();
        let expires = TimeDelta::try_days(self.ttl_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| ApiError::Internal("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|err| ApiError::Internal(format!("token encoding failed: {err}")))
    }

    /// Returns the account id for a well-signed, unexpired token.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Uuid> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|err| debug!("Rejected access token: {err}"))
        .ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> TokenConfig {
        TokenConfig::new(SecretString::from(secret.to_string()), DEFAULT_TOKEN_TTL_DAYS)
    }

    #[test]
    fn issued_token_verifies() {
        let config = config("unit-test-secret");
        let id = Uuid::new_v4();
        let token = config.issue(id).unwrap();
        assert_eq!(config.verify(&token), Some(id));
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = config("one").issue(Uuid::new_v4()).unwrap();
        assert_eq!(config("two").verify(&token), None);
        assert_eq!(config("one").verify("not.a.token"), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "unit-test-secret";
        let past = Utc::now() - TimeDelta::days(2);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: past.timestamp(),
            exp: (past + TimeDelta::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(config(secret).verify(&token), None);
    }

    #[test]
    fn oversized_lifetime_is_clamped() {
        let config = TokenConfig::new(SecretString::from("unit-test-secret".to_string()), i64::MAX);
        let id = Uuid::new_v4();
        let token = config.issue(id).unwrap();
        assert_eq!(config.verify(&token), Some(id));

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"unit-test-secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        let lifetime = data.claims.exp - data.claims.iat;
        assert!(lifetime <= MAX_TOKEN_TTL_DAYS * 86_400);
        assert!(lifetime > (MAX_TOKEN_TTL_DAYS - 1) * 86_400);
    }
}
