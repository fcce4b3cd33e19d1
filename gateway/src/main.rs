//! Main entry point for the Traider authentication gateway.
//!
//! This file initializes the Axum web server, loads configuration, and
//! registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod errors;
mod utils;

use crate::api::common::ApiResponse;
use crate::auth::service::AuthService;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    // A missing or empty SESSION_SECRET must abort startup here, not
    // surface later as tokens nobody can verify.
    let config = Config::from_env().unwrap();
    let auth_service = Arc::new(AuthService::new(&config));

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .layer(Extension(auth_service));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting Traider gateway on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Traider Gateway",
            "version": "0.1.0"
        }),
        "Welcome to the Traider Gateway API",
    ))
}
