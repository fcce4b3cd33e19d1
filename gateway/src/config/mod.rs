//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the identity backend base URL, the session signing secret, and session
//! lifetime windows.

use anyhow::{Context, Result, ensure};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream identity backend.
    pub identity_base_url: String,
    /// HMAC secret used to sign session tokens. Startup refuses to proceed
    /// without it; there is no insecure fallback value.
    pub session_secret: String,
    /// Maximum session age in seconds (default 8 hours).
    pub session_max_age_seconds: u64,
    /// Minimum token age in seconds before a session is silently reissued
    /// on active use (default 1 hour).
    pub session_renewal_seconds: u64,
    pub server_port: u16,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let identity_base_url = env::var("IDENTITY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let session_secret = env::var("SESSION_SECRET").context("SESSION_SECRET not set")?;
        ensure!(!session_secret.is_empty(), "SESSION_SECRET must not be empty");

        let session_max_age_seconds = env::var("SESSION_MAX_AGE_SECONDS")
            .unwrap_or_else(|_| "28800".to_string())
            .parse::<u64>()
            .context("SESSION_MAX_AGE_SECONDS must be a valid number")?;

        let session_renewal_seconds = env::var("SESSION_RENEWAL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .context("SESSION_RENEWAL_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        Ok(Config {
            identity_base_url,
            session_secret,
            session_max_age_seconds,
            session_renewal_seconds,
            server_port,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One combined test: the process environment is global, so splitting
    // these cases across parallel #[test] functions would race.
    #[test]
    fn from_env_requires_secret_and_applies_defaults() {
        unsafe {
            env::remove_var("SESSION_SECRET");
            env::remove_var("IDENTITY_BASE_URL");
            env::remove_var("SESSION_MAX_AGE_SECONDS");
            env::remove_var("SESSION_RENEWAL_SECONDS");
            env::remove_var("SERVER_PORT");
        }
        assert!(Config::from_env().is_err(), "missing secret must block startup");

        unsafe { env::set_var("SESSION_SECRET", "") };
        assert!(Config::from_env().is_err(), "empty secret must block startup");

        unsafe { env::set_var("SESSION_SECRET", "unit-test-secret") };
        let config = Config::from_env().expect("secret present");
        assert_eq!(config.identity_base_url, "http://localhost:8000");
        assert_eq!(config.session_max_age_seconds, 28800);
        assert_eq!(config.session_renewal_seconds, 3600);
        assert_eq!(config.server_port, 3000);

        unsafe {
            env::set_var("SESSION_MAX_AGE_SECONDS", "60");
            env::set_var("SESSION_RENEWAL_SECONDS", "10");
        }
        let config = Config::from_env().expect("overrides parse");
        assert_eq!(config.session_max_age_seconds, 60);
        assert_eq!(config.session_renewal_seconds, 10);

        unsafe {
            env::remove_var("SESSION_SECRET");
            env::remove_var("SESSION_MAX_AGE_SECONDS");
            env::remove_var("SESSION_RENEWAL_SECONDS");
        }
    }
}
