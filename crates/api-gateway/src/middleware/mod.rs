//! Middleware for the API gateway.
//!
//! # Components
//!
//! - `auth` - Edge authentication for filtered routes
//! - `http_metrics` - HTTP request metrics for every response

pub mod auth;
pub mod http_metrics;

pub use auth::authenticate;
pub use http_metrics::http_metrics_middleware;
