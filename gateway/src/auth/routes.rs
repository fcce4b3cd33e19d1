//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle endpoints like user login, session reads, and
//! sign-out. They are designed to be integrated into the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn auth_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route(
            "/session",
            get(session).layer(middleware::from_fn(session_auth)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Identity, Role};
    use crate::auth::service::AuthService;
    use crate::auth::validator::{CredentialValidator, LoginOverride};
    use crate::config::Config;
    use crate::errors::ServiceResult;
    use crate::utils::jwt::{Claims, SessionTokens};
    use async_trait::async_trait;
    use axum::Extension;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_config() -> Config {
        Config {
            identity_base_url: "http://127.0.0.1:1".to_string(),
            session_secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_max_age_seconds: 28800,
            session_renewal_seconds: 3600,
            server_port: 3000,
        }
    }

    /// Accepts exactly demo/demo123; declines everything else.
    struct DemoBackend;

    #[async_trait]
    impl LoginOverride for DemoBackend {
        async fn authenticate(
            &self,
            username: &str,
            password: &str,
        ) -> ServiceResult<Option<Identity>> {
            if username == "demo" && password == "demo123" {
                Ok(Some(Identity {
                    id: "41".to_string(),
                    username: username.to_string(),
                    display_name: username.to_string(),
                    email: format!("{username}@traider.local"),
                    role: Role::Trader,
                    permissions: vec![
                        "trading.execute".to_string(),
                        "portfolio.read".to_string(),
                    ],
                    last_login: Some(Utc::now()),
                }))
            } else {
                Ok(None)
            }
        }
    }

    fn test_app() -> Router {
        let config = test_config();
        let validator = CredentialValidator::new(config.identity_base_url.clone())
            .with_override(Arc::new(DemoBackend));
        let service = Arc::new(AuthService::with_parts(
            validator,
            SessionTokens::new(&config),
        ));
        Router::new()
            .nest("/auth", auth_router())
            .layer(Extension(service))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn login_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn session_request(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri("/auth/session");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn login_round_trip_returns_token_and_projection() {
        let app = test_app();
        let (status, body) = send(
            app,
            login_request(serde_json::json!({"username": "demo", "password": "demo123"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["access_token"].is_string());
        assert_eq!(body["expires_in"], 28800);
        assert_eq!(body["session"]["username"], "demo");
        assert_eq!(body["session"]["role"], "TRADER");
        assert_eq!(body["session"]["permissions"][0], "trading.execute");
        // Nothing credential-shaped crosses the wire back out.
        assert!(body["session"].get("password").is_none());
        assert!(body["session"].get("email").is_none());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = test_app();
        let (status, body) = send(
            app,
            login_request(serde_json::json!({"username": "demo", "password": "nope"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["error_type"], "unauthorized");
        assert_eq!(body["message"], "Invalid username or password");
    }

    #[tokio::test]
    async fn login_with_blank_username_is_bad_request() {
        let app = test_app();
        let (status, body) = send(
            app,
            login_request(serde_json::json!({"username": "", "password": "demo123"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["error_type"], "validation_error");
    }

    #[tokio::test]
    async fn session_requires_a_bearer_token() {
        let (status, _) = send(test_app(), session_request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/auth/session")
            .header(header::AUTHORIZATION, "Basic ZGVtbzpkZW1vMTIz")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(test_app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_rejects_a_garbage_token() {
        let (status, _) = send(test_app(), session_request(Some("not-a-token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn fresh_session_read_does_not_reissue() {
        let app = test_app();
        let (_, login_body) = send(
            app.clone(),
            login_request(serde_json::json!({"username": "demo", "password": "demo123"})),
        )
        .await;
        let token = login_body["access_token"].as_str().unwrap();

        let (status, body) = send(app, session_request(Some(token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["username"], "demo");
        assert!(body.get("access_token").is_none(), "fresh tokens are kept");
    }

    #[tokio::test]
    async fn aged_session_read_returns_a_replacement_token() {
        let config = test_config();
        let issued = Utc::now() - Duration::hours(2);
        let claims = Claims {
            sub: "41".to_string(),
            username: "demo".to_string(),
            role: Role::Trader,
            permissions: vec!["trading.execute".to_string()],
            last_login: Some(issued),
            iat: issued.timestamp() as usize,
            exp: (issued + Duration::hours(8)).timestamp() as usize,
            jti: Uuid::now_v7().to_string(),
        };
        let aged_token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(config.session_secret.as_bytes()),
        )
        .unwrap();

        let (status, body) = send(test_app(), session_request(Some(aged_token.as_str()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expires_in"], 28800);
        let replacement = body["access_token"].as_str().expect("token reissued");

        let renewed = SessionTokens::new(&config).verify(replacement).unwrap();
        assert_eq!(renewed.sub, "41");
        assert!(renewed.iat > claims.iat);
    }

    #[tokio::test]
    async fn logout_acknowledges() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");
    }
}
