//! Observability module for the auth service.
//!
//! # Privacy by Default
//!
//! All instrumentation uses `#[instrument(skip_all)]` and explicit safe field allow-listing.
//! Fields are categorized as:
//! - **SAFE**: Can be logged in plaintext (enums, outcome labels)
//! - **HASHED**: Must be SHA-256 hashed for correlation (email)
//! - **NEVER**: Must never appear in logs (passwords, tokens, signing key)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for the login email, which needs correlation across log entries but
/// must not be stored in plaintext.
///
/// This is a one-way hash for correlation only, not a secret-protection
/// mechanism.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    // First 4 bytes: enough for correlation, limits reversibility
    hex::encode(result.get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid credentials
    Authentication,
    /// Malformed or rejected request fields
    Validation,
    /// Signing or hashing failures
    Cryptographic,
    /// Database and other internal failures
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Cryptographic => "cryptographic",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&crate::errors::AuthError> for ErrorCategory {
    fn from(err: &crate::errors::AuthError) -> Self {
        use crate::errors::AuthError;
        match err {
            AuthError::InvalidCredentials => ErrorCategory::Authentication,
            AuthError::Validation(_) => ErrorCategory::Validation,
            AuthError::Crypto(_) => ErrorCategory::Cryptographic,
            AuthError::Database(_) => ErrorCategory::Internal,
        }
    }
}
