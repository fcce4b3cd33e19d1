//! Global application error types and handlers.
//!
//! This module defines custom error types that are used across the entire
//! gateway and provides mechanisms for consistent error handling and
//! response formatting.

use thiserror::Error;

/// Internal taxonomy for a failed credential validation.
///
/// These causes are logged for audit but deliberately collapse to a single
/// unauthenticated outcome at the validator boundary, so a caller (or an
/// attacker probing the login endpoint) can never distinguish a backend
/// outage from a wrong password from a mangled payload.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity backend could not be reached, or the call timed out.
    #[error("identity backend unreachable: {0}")]
    Transport(String),
    /// The identity backend answered with a non-2xx status.
    #[error("identity backend rejected credentials (status {0})")]
    Rejected(u16),
    /// The identity backend answered 2xx but the payload was missing
    /// required fields or was not valid JSON.
    #[error("malformed identity payload: {0}")]
    Malformed(String),
    /// An installed login override returned an error.
    #[error("login override failed: {0}")]
    Override(String),
}

/// Generic service error that can be used across all entities
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}
