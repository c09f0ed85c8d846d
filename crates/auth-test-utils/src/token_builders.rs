//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating signed identity tokens, including the
//! broken kinds the gateway must reject.

use crate::crypto_fixtures::test_signing_secret;
use chrono::{Duration, Utc};
use common::jwt::{IdentityClaims, SigningSecret, TOKEN_ALGORITHM};
use jsonwebtoken::{encode, Header};
use std::sync::Arc;

/// Builder for creating signed test tokens
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("ada@example.com")
///     .with_role("ADMIN")
///     .expires_in(3600)
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
    secret: Arc<SigningSecret>,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-user@example.com".to_string(),
            role: "USER".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(3600)).timestamp(),
            secret: test_signing_secret(),
        }
    }

    /// Set the subject (user email)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set the role claim
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    /// Set expiration in seconds from now
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Make the token already expired
    pub fn expired(mut self) -> Self {
        let now = Utc::now();
        self.iat = (now - Duration::seconds(7200)).timestamp();
        self.exp = (now - Duration::seconds(3600)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Sign with a different secret than the one validators use
    pub fn signed_with(mut self, secret: Arc<SigningSecret>) -> Self {
        self.secret = secret;
        self
    }

    /// Build the claims without signing
    pub fn build(&self) -> IdentityClaims {
        IdentityClaims {
            sub: self.sub.clone(),
            role: self.role.clone(),
            iat: self.iat,
            exp: self.exp,
        }
    }

    /// Build and sign the token
    pub fn sign(self) -> String {
        encode(
            &Header::new(TOKEN_ALGORITHM),
            &self.build(),
            &self.secret.encoding_key(),
        )
        .expect("signing a test token should succeed")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip one character of the signature segment.
///
/// The header and payload are untouched, so the token still parses.
pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token
        .rsplit_once('.')
        .expect("token should have a signature segment");
    let mut chars: Vec<char> = signature.chars().collect();
    let first = chars.first().copied().expect("signature should not be empty");
    chars[0] = if first == 'A' { 'B' } else { 'A' };
    format!("{head}.{}", chars.into_iter().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto_fixtures::{foreign_signing_secret, test_validator};

    #[test]
    fn test_builder_defaults_are_valid() {
        let token = TestTokenBuilder::new().sign();
        assert!(!test_validator().is_invalid(&token));
    }

    #[test]
    fn test_builder_sets_claims() {
        let claims = TestTokenBuilder::new()
            .for_user("ada@example.com")
            .with_role("ADMIN")
            .build();

        assert_eq!(claims.sub, "ada@example.com");
        assert_eq!(claims.role, "ADMIN");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = TestTokenBuilder::new().expired().sign();
        assert!(test_validator().is_invalid(&token));
    }

    #[test]
    fn test_foreign_token_rejected() {
        let token = TestTokenBuilder::new()
            .signed_with(foreign_signing_secret())
            .sign();
        assert!(test_validator().is_invalid(&token));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let token = TestTokenBuilder::new().sign();
        let tampered = tamper_signature(&token);

        assert_ne!(token, tampered);
        assert!(test_validator().is_invalid(&tampered));
    }
}
