//! Error body shared by every Gatekeeper HTTP surface.
//!
//! Services map their own error enums onto this body so that clients see the
//! same JSON shape whether a request was rejected at the gateway edge or by a
//! service behind it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON error body: `{"message", "details", "status", "timestamp"}`.
///
/// `message` is human readable and intentionally generic. `details` carries a
/// stable machine-readable code (e.g. `INVALID_TOKEN`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub details: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Build an error body stamped with the current time.
    #[must_use]
    pub fn new(status: u16, details: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: details.to_string(),
            status,
            timestamp: Utc::now(),
        }
    }
}
