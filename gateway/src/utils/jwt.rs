//! Session token utilities for authentication.
//!
//! Provides signed session token creation, validation, and the silent
//! renewal that keeps active sessions alive without re-prompting for
//! credentials.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::models::{Identity, Role};
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};

/// Claims embedded in every session token.
///
/// Carries the identity payload plus issue/expiry bookkeeping. Credentials,
/// the synthesized email, and the display name are never embedded.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Token issued at timestamp
    pub iat: usize,
    /// Token expiration timestamp
    pub exp: usize,
    /// Unique token identifier for audit correlation.
    pub jti: String,
}

/// Creates and validates signed session tokens.
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    max_age: Duration,
    renewal_window: Duration,
}

impl SessionTokens {
    /// Create a new SessionTokens instance from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.session_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.session_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        SessionTokens {
            encoding_key,
            decoding_key,
            validation,
            max_age: Duration::seconds(config.session_max_age_seconds as i64),
            renewal_window: Duration::seconds(config.session_renewal_seconds as i64),
        }
    }

    /// Lifetime of a freshly issued token, in seconds.
    pub fn max_age_seconds(&self) -> u64 {
        self.max_age.num_seconds() as u64
    }

    /// Issue a fresh session token for a validated identity.
    ///
    /// Returns both the signed token and the claims that went into it so
    /// callers can project a view without re-decoding.
    pub fn issue(&self, identity: &Identity) -> ServiceResult<(String, Claims)> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.id.clone(),
            username: identity.username.clone(),
            role: identity.role,
            permissions: identity.permissions.clone(),
            last_login: identity.last_login,
            iat: now.timestamp() as usize,
            exp: (now + self.max_age).timestamp() as usize,
            jti: Uuid::now_v7().to_string(),
        };

        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    /// Validate and decode a session token.
    pub fn verify(&self, token: &str) -> ServiceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::validation(format!("Token validation failed: {}", e)))
    }

    /// Silently reissue a session that has been active past the renewal
    /// window.
    ///
    /// Returns `Some((token, claims))` only when `now` is at least the
    /// renewal window past the token's issue time and the token has not yet
    /// expired; otherwise `None`, meaning the caller keeps the original
    /// token. The embedded identity payload is copied verbatim; only
    /// `iat`, `exp`, and `jti` change. An expired session is never renewed,
    /// it requires a fresh login.
    pub fn maybe_renew(
        &self,
        claims: &Claims,
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<(String, Claims)>> {
        let age_seconds = now.timestamp() - claims.iat as i64;
        if age_seconds < self.renewal_window.num_seconds() {
            return Ok(None);
        }
        if now.timestamp() >= claims.exp as i64 {
            return Ok(None);
        }

        let renewed = Claims {
            iat: now.timestamp() as usize,
            exp: (now + self.max_age).timestamp() as usize,
            jti: Uuid::now_v7().to_string(),
            ..claims.clone()
        };
        let token = self.encode_claims(&renewed)?;
        Ok(Some((token, renewed)))
    }

    fn encode_claims(&self, claims: &Claims) -> ServiceResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }
}
