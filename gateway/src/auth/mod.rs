//! Authentication module for credential validation, session issuance, and
//! access control.
//!
//! This module provides the public interface for authentication-related
//! functionality such as login, session reads, sign-out, and authorization
//! middleware.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod validator;
