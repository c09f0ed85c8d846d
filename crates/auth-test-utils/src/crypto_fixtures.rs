//! Deterministic cryptographic fixtures for testing
//!
//! Fixed signing secrets and cheap bcrypt hashes so that tests are
//! reproducible and fast.

use common::jwt::{SigningSecret, TokenValidator};
use std::sync::Arc;

/// Signing secret shared by the test issuer and test validators.
pub const TEST_SECRET_KEY: &str = "gatekeeper-test-secret-key-0123456789abcdef";

/// A different, equally valid secret. Tokens signed with it must be rejected.
pub const FOREIGN_SECRET_KEY: &str = "some-other-issuer-secret-key-fedcba9876543210";

/// Bcrypt cost used for fixtures. Bcrypt's floor; production uses 12.
pub const TEST_BCRYPT_COST: u32 = 4;

/// The shared test signing secret.
pub fn test_signing_secret() -> Arc<SigningSecret> {
    Arc::new(SigningSecret::from_config_value(TEST_SECRET_KEY).expect("test secret is valid"))
}

/// A signing secret unknown to the test validators.
pub fn foreign_signing_secret() -> Arc<SigningSecret> {
    Arc::new(
        SigningSecret::from_config_value(FOREIGN_SECRET_KEY).expect("foreign secret is valid"),
    )
}

/// Validator over [`test_signing_secret`].
pub fn test_validator() -> TokenValidator {
    TokenValidator::new(test_signing_secret())
}

/// Bcrypt hash of `password` at [`TEST_BCRYPT_COST`].
pub fn test_password_hash(password: &str) -> String {
    bcrypt::hash(password, TEST_BCRYPT_COST).expect("bcrypt hashing should succeed")
}
