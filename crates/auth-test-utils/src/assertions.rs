//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for issued identity tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::jwt::IdentityClaims;
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    #[serde(default)]
    pub typ: Option<String>,
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject("ada@example.com")
///     .assert_has_role("ADMIN")
///     .assert_expires_in(3600);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HS256 JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert that the token carries the specified role
    fn assert_has_role(&self, role: &str) -> &Self;

    /// Assert that `exp - iat` equals the specified seconds
    fn assert_expires_in(&self, seconds: i64) -> &Self;
}

fn segment(token: &str, index: usize) -> Vec<u8> {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT segment {index} missing"));
    URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT segment {index}: {e}"))
}

fn claims(token: &str) -> IdentityClaims {
    serde_json::from_slice(&segment(token, 1))
        .unwrap_or_else(|e| panic!("Failed to parse JWT claims JSON: {e}"))
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts = self.split('.').count();
        assert_eq!(
            parts, 3,
            "JWT must have 3 parts (header.payload.signature), got {parts}"
        );

        let header: JwtHeader = serde_json::from_slice(&segment(self, 0))
            .unwrap_or_else(|e| panic!("Failed to parse JWT header JSON: {e}"));
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        if let Some(typ) = header.typ {
            assert_eq!(typ, "JWT", "Expected JWT type");
        }

        // Claims must deserialize into the identity claim set
        claims(self);
        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        assert_eq!(claims(self).sub, subject, "Token subject mismatch");
        self
    }

    fn assert_has_role(&self, role: &str) -> &Self {
        assert_eq!(claims(self).role, role, "Token role mismatch");
        self
    }

    fn assert_expires_in(&self, seconds: i64) -> &Self {
        let claims = claims(self);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Token lifetime should be {seconds}s"
        );
        self
    }
}
