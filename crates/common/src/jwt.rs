//! Identity token utilities shared across Gatekeeper services.
//!
//! This module provides:
//! - The identity token claims structure (`sub`, `role`, `iat`, `exp`)
//! - The shared HMAC signing secret, loaded once at startup
//! - The token validator used by the gateway edge
//! - Size limits for DoS prevention
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted; any other `alg` header is rejected
//! - A token is valid iff its signature verifies AND `now < exp`
//! - Generic error messages prevent information leakage
//! - The `sub` field in claims is redacted in Debug output
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{SigningSecret, TokenValidator};
//! use std::sync::Arc;
//!
//! let secret = Arc::new(SigningSecret::from_config_value(&raw_key)?);
//! let validator = TokenValidator::new(secret);
//!
//! if validator.is_invalid(token) {
//!     // reject with 401
//! }
//! ```

use crate::secret::{ExposeSecret, SecretBox};
use jsonwebtoken::{decode, Algorithm, DecodingKey, EncodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Tokens larger than this are rejected BEFORE base64 decoding or signature
/// verification. A typical identity token is well under 400 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Minimum length of the HMAC signing secret in bytes.
///
/// HS256 keys shorter than the hash output (256 bits) are rejected at startup.
pub const MIN_SECRET_KEY_BYTES: usize = 32;

/// The only signing algorithm issued and accepted.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during token validation.
///
/// Note: Error messages are intentionally generic to prevent information leakage.
/// Detailed information is logged at debug level for troubleshooting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token could not be parsed, has the wrong algorithm, or its signature
    /// does not verify against the shared secret.
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token `exp` is at or before the current time.
    #[error("The access token is invalid or expired")]
    Expired,
}

/// Errors raised while loading the signing secret from configuration.
///
/// These are startup failures, never per-request failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtConfigError {
    /// The configured secret is empty.
    #[error("Token secret key is empty")]
    EmptySecret,

    /// The configured secret is shorter than [`MIN_SECRET_KEY_BYTES`].
    #[error("Token secret key must be at least {min} bytes, got {len}")]
    SecretTooShort { len: usize, min: usize },
}

// =============================================================================
// Signing Secret
// =============================================================================

/// Shared HMAC key known to the token issuer and to every validator.
///
/// Loaded once at process start and shared read-only behind an `Arc`.
/// The key bytes are held in a [`SecretBox`], so `Debug` output is redacted.
pub struct SigningSecret {
    key: SecretBox<Vec<u8>>,
}

impl SigningSecret {
    /// Build the secret from its raw configured value.
    ///
    /// The UTF-8 bytes of the value are used directly as the HMAC key.
    ///
    /// # Errors
    ///
    /// - `JwtConfigError::EmptySecret` if the value is empty
    /// - `JwtConfigError::SecretTooShort` if it is shorter than [`MIN_SECRET_KEY_BYTES`]
    pub fn from_config_value(value: &str) -> Result<Self, JwtConfigError> {
        Self::from_bytes(value.as_bytes().to_vec())
    }

    /// Build the secret from raw key bytes.
    ///
    /// # Errors
    ///
    /// Same as [`SigningSecret::from_config_value`].
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, JwtConfigError> {
        if bytes.is_empty() {
            return Err(JwtConfigError::EmptySecret);
        }
        if bytes.len() < MIN_SECRET_KEY_BYTES {
            return Err(JwtConfigError::SecretTooShort {
                len: bytes.len(),
                min: MIN_SECRET_KEY_BYTES,
            });
        }

        Ok(Self {
            key: SecretBox::new(Box::new(bytes)),
        })
    }

    /// Key used by the issuer to sign tokens.
    #[must_use]
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.key.expose_secret())
    }

    /// Key used by validators to verify token signatures.
    #[must_use]
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.key.expose_secret())
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Claims Types
// =============================================================================

/// Identity token claims.
///
/// # Fields
///
/// - `sub`: Subject (the user's email)
/// - `role`: Role of the subject (e.g. `ADMIN`, `USER`)
/// - `iat`: Issued-at timestamp (Unix epoch seconds)
/// - `exp`: Expiration timestamp (Unix epoch seconds), always `iat + TTL`
///
/// # Security
///
/// The `sub` field is redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (user email) - redacted in Debug output.
    pub sub: String,

    /// Role claim.
    pub role: String,

    /// Issued-at timestamp (Unix epoch seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for IdentityClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityClaims")
            .field("sub", &"[REDACTED]")
            .field("role", &self.role)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl IdentityClaims {
    /// Creates claims issued at `iat` that expire `ttl_seconds` later.
    #[must_use]
    pub fn new(sub: String, role: String, iat: i64, ttl_seconds: i64) -> Self {
        Self {
            sub,
            role,
            iat,
            exp: iat.saturating_add(ttl_seconds),
        }
    }

    /// Whether the token is expired at `now`.
    ///
    /// The expiry instant itself is already expired.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Verifies identity token signatures and expiry.
///
/// Cheap to clone; the secret is shared.
#[derive(Clone, Debug)]
pub struct TokenValidator {
    secret: Arc<SigningSecret>,
}

impl TokenValidator {
    /// Create a validator over the shared signing secret.
    #[must_use]
    pub fn new(secret: Arc<SigningSecret>) -> Self {
        Self { secret }
    }

    /// Whether `token` must be rejected.
    ///
    /// Never fails: any parse, signature or expiry problem reports `true`.
    #[must_use]
    pub fn is_invalid(&self, token: &str) -> bool {
        self.validate(token).is_err()
    }

    /// [`TokenValidator::is_invalid`] against an explicit `now` timestamp.
    #[must_use]
    pub fn is_invalid_at(&self, token: &str, now: i64) -> bool {
        self.validate_at(token, now).is_err()
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    ///
    /// - `TokenTooLarge` - token exceeds [`MAX_JWT_SIZE_BYTES`]
    /// - `MalformedToken` - not a JWT, wrong algorithm, missing claims, bad signature
    /// - `Expired` - `now >= exp`
    pub fn validate(&self, token: &str) -> Result<IdentityClaims, JwtValidationError> {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }

    /// Deterministic validation against an explicit `now` timestamp.
    ///
    /// Prefer [`TokenValidator::validate`] in production code. This variant
    /// exists so that expiry boundaries can be tested without wall-clock
    /// dependence.
    ///
    /// # Errors
    ///
    /// Same as [`TokenValidator::validate`].
    pub fn validate_at(&self, token: &str, now: i64) -> Result<IdentityClaims, JwtValidationError> {
        if token.len() > MAX_JWT_SIZE_BYTES {
            tracing::debug!(
                target: "common.jwt",
                token_size = token.len(),
                max_size = MAX_JWT_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(JwtValidationError::TokenTooLarge);
        }

        // Expiry is compared against `now` below so that the boundary is exact
        // and injectable; the library check would apply its own clock and leeway.
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<IdentityClaims>(token, &self.secret.decoding_key(), &validation)
            .map_err(|e| {
                tracing::debug!(target: "common.jwt", error = %e, "Token verification failed");
                JwtValidationError::MalformedToken
            })?;

        let claims = token_data.claims;
        if claims.is_expired_at(now) {
            tracing::debug!(
                target: "common.jwt",
                exp = claims.exp,
                now = now,
                "Token rejected: expired"
            );
            return Err(JwtValidationError::Expired);
        }

        Ok(claims)
    }
}

// =============================================================================
// Tests
// =============================================================================
