//! Data structures for authentication-related entities.
//!
//! This module defines the closed role tier, the login request/response
//! models, the validated identity record, and the client-visible session
//! projection used across the authentication flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::utils::jwt::Claims;

/// Permission tier assigned to every authenticated session.
///
/// The upstream identity backend reports roles as free text; the gateway
/// collapses that text into exactly these three values before a token is
/// ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Trader,
    #[default]
    Viewer,
}

impl Role {
    /// Maps an arbitrary backend role string onto the closed tier.
    ///
    /// Matching is case-insensitive but exact: no trimming is applied, so a
    /// padded value like `" admin"` falls back to [`Role::Viewer`] instead
    /// of gaining admin rights. Unknown strings, empty strings, and numeric
    /// strings all land on `Viewer` as the least-privilege default.
    pub fn normalize(raw: &str) -> Self {
        Self::from_known(raw).unwrap_or_default()
    }

    /// The exact-match table behind [`Role::normalize`]. Returns `None` for
    /// anything that would hit the fallback, letting callers audit-log the
    /// downgrade before defaulting.
    pub fn from_known(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "admin" | "administrator" => Some(Role::Admin),
            "trader" | "trading" => Some(Role::Trader),
            "viewer" | "view" | "readonly" => Some(Role::Viewer),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Trader => "TRADER",
            Role::Viewer => "VIEWER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Login request payload
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Credentials must never reach a log sink in plaintext, so the password is
// masked even in debug formatting.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Validated user record produced by a successful credential exchange.
///
/// Only exists after the identity backend has accepted the credentials;
/// discarded when validation fails.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub display_name: String,
    /// Synthesized as `{username}@traider.local`.
    pub email: String,
    pub role: Role,
    pub permissions: Vec<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Identity {
    /// Compact rendering for audit log lines.
    pub fn audit_label(&self) -> String {
        format!("{} <{}>", self.display_name, self.email)
    }
}

/// Client-visible projection of a session token.
///
/// Built by explicit field-by-field copy so that claims added to the token
/// later (or anything credential-shaped) can never leak through to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub permissions: Vec<String>,
    /// Omitted from the serialized view when the token carries none; never
    /// fabricated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl SessionView {
    /// Projects verified token claims into the allow-listed client view.
    pub fn project(claims: &Claims) -> Self {
        SessionView {
            id: claims.sub.clone(),
            username: claims.username.clone(),
            role: claims.role,
            permissions: claims.permissions.clone(),
            last_login: claims.last_login,
        }
    }
}

/// Login response containing the signed session token and its projection
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub session: SessionView,
}

/// Session read response, carrying a silently reissued token when the
/// renewal window has elapsed
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
    /// Present only when the session was silently reissued on this read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}
