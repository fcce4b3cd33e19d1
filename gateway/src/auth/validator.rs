//! Credential validation against the upstream identity backend.
//!
//! The validator exchanges a username/password pair for an identity record
//! over HTTP. Every failure mode (transport trouble, rejected credentials,
//! a mangled payload, an override error) collapses to `None` at this
//! boundary so the caller, and anyone probing the login endpoint, cannot
//! tell them apart; the distinct cause is only logged for audit.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::auth::models::{Identity, Role};
use crate::errors::{AuthError, ServiceResult};

/// Hard upper bound on a single identity backend call. The in-flight
/// request is aborted when it expires.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Replacement strategy for the identity backend call.
///
/// While an override is installed the validator routes every validation
/// through it exclusively and performs no network activity. `Ok(None)` and
/// `Err(_)` both collapse to an unauthenticated outcome, keeping the
/// override path symmetric with production failure handling.
#[async_trait]
pub trait LoginOverride: Send + Sync {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ServiceResult<Option<Identity>>;
}

// No Debug impl: this struct carries the plaintext password.
#[derive(Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
    remember_me: bool,
}

/// Strict decode of the slice of the upstream response the gateway needs.
/// Extra upstream fields (`access_token`, `token_type`, `expires_in`) are
/// ignored; a missing `user`, or any missing field inside it, fails the
/// decode and the login with it.
#[derive(Debug, Deserialize)]
struct LoginReply {
    user: UpstreamUser,
}

#[derive(Debug, Deserialize)]
struct UpstreamUser {
    #[serde(deserialize_with = "deserialize_user_id")]
    id: String,
    username: String,
    role: String,
    permissions: Vec<String>,
}

/// Upstream ids arrive as either a JSON string or an integer depending on
/// the backend build; both are carried as strings from here on.
fn deserialize_user_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Text(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Text(s) => s,
    })
}

/// Exchanges credentials for an upstream identity record.
pub struct CredentialValidator {
    client: Client,
    base_url: String,
    timeout: Duration,
    override_backend: Option<Arc<dyn LoginOverride>>,
}

impl CredentialValidator {
    pub fn new(base_url: impl Into<String>) -> Self {
        CredentialValidator {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: LOGIN_TIMEOUT,
            override_backend: None,
        }
    }

    /// Shortens the network timeout. Tests use this to exercise the
    /// timeout path without waiting out the production bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Installs a validation override at construction time.
    pub fn with_override(mut self, backend: Arc<dyn LoginOverride>) -> Self {
        self.override_backend = Some(backend);
        self
    }

    /// Installs or clears the validation override. Passing `None` restores
    /// the network path on the next call.
    pub fn set_override(&mut self, backend: Option<Arc<dyn LoginOverride>>) {
        self.override_backend = backend;
    }

    /// Validates credentials, yielding the identity on success and `None`
    /// on every kind of failure.
    pub async fn validate(&self, username: &str, password: &str) -> Option<Identity> {
        if let Some(backend) = &self.override_backend {
            return match backend.authenticate(username, password).await {
                Ok(Some(identity)) => Some(identity),
                Ok(None) => {
                    warn!(username = %username, "login rejected by override");
                    None
                }
                Err(e) => {
                    let failure = AuthError::Override(e.to_string());
                    warn!(username = %username, error = %failure, "login rejected");
                    None
                }
            };
        }

        match self.call_backend(username, password).await {
            Ok(identity) => Some(identity),
            Err(failure) => {
                warn!(username = %username, error = %failure, "login rejected");
                None
            }
        }
    }

    async fn call_backend(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let url = format!("{}/auth/login", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&LoginPayload {
                username,
                password,
                remember_me: false,
            })
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            // Drain the body so the connection can be reused, then discard it.
            let _ = response.bytes().await;
            return Err(AuthError::Rejected(status.as_u16()));
        }

        let reply: LoginReply = response.json().await.map_err(|e| {
            if e.is_decode() {
                AuthError::Malformed(e.to_string())
            } else {
                classify_transport(&e)
            }
        })?;

        Ok(build_identity(username, reply.user))
    }
}

fn classify_transport(error: &reqwest::Error) -> AuthError {
    if error.is_timeout() {
        AuthError::Transport("request timed out".to_string())
    } else {
        AuthError::Transport(error.to_string())
    }
}

fn build_identity(username: &str, user: UpstreamUser) -> Identity {
    let role = match Role::from_known(&user.role) {
        Some(role) => role,
        None => {
            warn!(
                username = %username,
                role = %user.role,
                "unrecognized backend role, defaulting to viewer"
            );
            Role::default()
        }
    };

    Identity {
        id: user.id,
        username: user.username,
        display_name: username.to_string(),
        email: format!("{username}@traider.local"),
        role,
        permissions: user.permissions,
        last_login: Some(Utc::now()),
    }
}
