//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for session sign-in,
//! session reads, and sign-out, parse request data, and interact with the
//! `auth::service` for core business logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use std::sync::Arc;

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match auth_service.sign_in(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Describe the current session, silently reissuing the token when the
/// renewal window has elapsed
#[axum::debug_handler]
pub async fn session(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<SessionResponse>, (StatusCode, String)> {
    match auth_service.current_session(&claims) {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> Result<ResponseJson<serde_json::Value>, (StatusCode, String)> {
    // Tokens are not tracked server side; sign-out is acknowledged and the
    // client drops its copy. The server can maintain a blacklist if we
    // later need enhanced revocation.
    Ok(ResponseJson(serde_json::json!({
        "message": "Logged out successfully"
    })))
}
