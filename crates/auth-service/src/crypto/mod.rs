//! Cryptographic operations for the auth service.
//!
//! - Identity token signing (HS256 over the shared secret)
//! - Password verification (bcrypt)

use crate::errors::AuthError;
use common::jwt::{IdentityClaims, SigningSecret, TOKEN_ALGORITHM};
use jsonwebtoken::{encode, Header};
use tracing::instrument;

/// Bcrypt hash verified when the requested user does not exist.
///
/// Keeps the unknown-email path as slow as the wrong-password path.
pub const DUMMY_PASSWORD_HASH: &str =
    "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Sign identity claims with the shared HMAC secret.
#[instrument(skip_all)]
pub fn sign_token(claims: &IdentityClaims, secret: &SigningSecret) -> Result<String, AuthError> {
    let mut header = Header::new(TOKEN_ALGORITHM);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &secret.encoding_key())
        .map_err(|e| AuthError::Crypto(format!("JWT signing operation failed: {e}")))
}

/// Verify a password against a bcrypt hash
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::Crypto(format!("Password verification failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::jwt::TokenValidator;
    use std::sync::Arc;

    const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-bytes!";

    #[test]
    fn test_sign_token_verifies_with_same_secret() {
        let secret = Arc::new(SigningSecret::from_config_value(TEST_SECRET).unwrap());
        let claims = IdentityClaims::new(
            "ada@example.com".to_string(),
            "ADMIN".to_string(),
            1_700_000_000,
            3600,
        );

        let token = sign_token(&claims, &secret).unwrap();
        let validated = TokenValidator::new(secret)
            .validate_at(&token, 1_700_000_001)
            .unwrap();

        assert_eq!(validated, claims);
    }

    #[test]
    fn test_sign_token_header_is_hs256() {
        let secret = SigningSecret::from_config_value(TEST_SECRET).unwrap();
        let claims = IdentityClaims::new("a@b.com".to_string(), "USER".to_string(), 0, 60);

        let token = sign_token(&claims, &secret).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.alg, jsonwebtoken::Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
        assert!(header.kid.is_none());
    }

    #[test]
    fn test_verify_password() {
        let hash = bcrypt::hash("correct-horse", 4).unwrap();

        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("battery-staple", &hash).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        assert!(!verify_password("anything", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("pw", "not-a-bcrypt-hash"),
            Err(AuthError::Crypto(_))
        ));
    }
}
