//! Common utilities and types shared across Gatekeeper components.

#![warn(clippy::pedantic)]

/// Module for the JSON error body returned by every service
pub mod error;

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for identity token claims, the shared signing secret and validation
pub mod jwt;
