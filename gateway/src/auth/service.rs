//! Core business logic for the authentication gateway.

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::auth::models::{LoginRequest, LoginResponse, SessionResponse, SessionView};
use crate::auth::validator::CredentialValidator;
use crate::config::Config;
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::jwt::{Claims, SessionTokens};

/// Authentication service tying credential validation to session issuance
pub struct AuthService {
    validator: CredentialValidator,
    tokens: SessionTokens,
}

impl AuthService {
    /// Create a new AuthService instance from the loaded configuration
    pub fn new(config: &Config) -> Self {
        AuthService {
            validator: CredentialValidator::new(config.identity_base_url.clone()),
            tokens: SessionTokens::new(config),
        }
    }

    /// Assemble the service from prebuilt parts. Tests use this to install
    /// a validation override or a shortened network timeout.
    pub fn with_parts(validator: CredentialValidator, tokens: SessionTokens) -> Self {
        AuthService { validator, tokens }
    }

    /// Validate credentials and open a session
    pub async fn sign_in(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        // Validate input
        if let Err(validation_errors) = login_request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        // Exchange credentials for an identity record. Every failure mode
        // has already been collapsed to None below this call.
        let identity = self
            .validator
            .validate(&login_request.username, &login_request.password)
            .await
            .ok_or_else(|| ServiceError::unauthorized("Invalid username or password"))?;

        let (access_token, claims) = self.tokens.issue(&identity)?;

        info!(
            user = %identity.audit_label(),
            role = %identity.role,
            jti = %claims.jti,
            "session opened"
        );

        Ok(LoginResponse {
            access_token,
            expires_in: self.tokens.max_age_seconds(),
            session: SessionView::project(&claims),
        })
    }

    /// Validate and decode a bearer token into its claims
    pub fn verify_session(&self, token: &str) -> ServiceResult<Claims> {
        self.tokens.verify(token)
    }

    /// Describe the session behind verified claims, silently reissuing the
    /// token when the renewal window has elapsed
    pub fn current_session(&self, claims: &Claims) -> ServiceResult<SessionResponse> {
        match self.tokens.maybe_renew(claims, Utc::now())? {
            Some((access_token, renewed)) => {
                info!(
                    username = %renewed.username,
                    jti = %renewed.jti,
                    "session silently renewed"
                );
                Ok(SessionResponse {
                    session: SessionView::project(&renewed),
                    access_token: Some(access_token),
                    expires_in: Some(self.tokens.max_age_seconds()),
                })
            }
            None => Ok(SessionResponse {
                session: SessionView::project(claims),
                access_token: None,
                expires_in: None,
            }),
        }
    }
}
