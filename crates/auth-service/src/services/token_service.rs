//! Identity token issuance.

use crate::crypto;
use crate::errors::AuthError;
use chrono::Utc;
use common::jwt::{IdentityClaims, SigningSecret};
use std::sync::Arc;
use std::time::Duration;

/// Issues signed identity tokens with a fixed lifetime.
///
/// The signing secret is validated once at startup; issuance itself only
/// fails if signing fails.
#[derive(Clone, Debug)]
pub struct TokenService {
    secret: Arc<SigningSecret>,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a token service.
    ///
    /// `ttl` is truncated to whole seconds, matching the resolution of the
    /// `iat` and `exp` claims.
    pub fn new(secret: Arc<SigningSecret>, ttl: Duration) -> Self {
        Self {
            secret,
            ttl_seconds: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issue a token for `identifier` carrying `role`, valid from now.
    pub fn issue(&self, identifier: &str, role: &str) -> Result<String, AuthError> {
        self.issue_at(identifier, role, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, identifier: &str, role: &str, now: i64) -> Result<String, AuthError> {
        let claims = IdentityClaims::new(
            identifier.to_string(),
            role.to_string(),
            now,
            self.ttl_seconds,
        );

        crypto::sign_token(&claims, &self.secret)
    }
}
