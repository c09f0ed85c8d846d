//! Auth Service Library
//!
//! Issues identity tokens for the Gatekeeper API gateway. A client posts its
//! email and password to `POST /auth/login`; on success the service returns a
//! bare HS256-signed token carrying `sub` (email), `role`, `iat` and `exp`.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Token signing and password hashing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Request models
//! - `repositories` - Database access layer
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
