//! # Auth Test Utilities
//!
//! Shared test utilities for the auth service and the API gateway.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed signing secrets, fast bcrypt hashes)
//! - Test data builders (`TestTokenBuilder` for valid, expired, tampered and
//!   foreign-key tokens)
//! - Server test harness (`TestAuthServer` for E2E tests)
//! - Custom assertions (`TokenAssertions` trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let token = TestTokenBuilder::new()
//!         .for_user("ada@example.com")
//!         .with_role("ADMIN")
//!         .sign();
//!
//!     token.assert_valid_jwt()
//!          .assert_for_subject("ada@example.com")
//!          .assert_has_role("ADMIN");
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
