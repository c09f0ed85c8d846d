//! Observability module for the API gateway.
//!
//! Provides metrics definitions and recording helpers. Tokens, passwords and
//! emails never appear in labels or log fields.

pub mod metrics;
