//! API Gateway Library
//!
//! Single entry point in front of the Gatekeeper services. Requests to
//! `/users` and `/departments` pass the edge authentication filter: a valid
//! bearer token, or login credentials in the body that the auth service
//! exchanges for one. Services behind the gateway trust it and perform no
//! authentication of their own.
//!
//! # Modules
//!
//! - `auth` - Route classification and the edge authentication decision
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - Reverse proxy, health and metrics handlers
//! - `middleware` - Edge authentication and HTTP metrics layers
//! - `services` - Auth service client for credential exchange

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod services;
