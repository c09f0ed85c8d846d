//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used across Gatekeeper. Login passwords,
//! the token signing key and bearer tokens in transit are all held in these
//! wrappers so that a derived `Debug` on any containing struct prints
//! `[REDACTED]` instead of the value.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct LoginRequest {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let json = r#"{"email": "ada@example.com", "password": "hunter22"}"#;
//! let req: LoginRequest = serde_json::from_str(json).unwrap();
//!
//! assert!(!format!("{req:?}").contains("hunter22"));
//! assert_eq!(req.password.expose_secret(), "hunter22");
//! ```
//!
//! Use `SecretString` for passwords and bearer tokens, and `SecretBox<Vec<u8>>`
//! for binary key material such as the HMAC signing key.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::from("hunter22");
        let debug_str = format!("{secret:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("hunter22"));
    }

    #[test]
    fn test_expose_secret_returns_inner_value() {
        let secret = SecretString::from("password123");
        assert_eq!(secret.expose_secret(), "password123");
    }

    #[test]
    fn test_binary_secret_is_redacted() {
        let key = SecretBox::new(Box::new(b"0123456789abcdef0123456789abcdef".to_vec()));
        let debug_str = format!("{key:?}");

        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("0123456789"));
        assert_eq!(key.expose_secret().len(), 32);
    }

    #[test]
    fn test_deserialize_login_credentials() {
        #[allow(dead_code)]
        #[derive(Debug, Deserialize)]
        struct Credentials {
            email: String,
            password: SecretString,
        }

        let json = r#"{"email": "bob@example.com", "password": "my-secret-value"}"#;
        let creds: Credentials = serde_json::from_str(json).expect("deserialize");

        assert_eq!(creds.password.expose_secret(), "my-secret-value");

        let debug = format!("{creds:?}");
        assert!(debug.contains("bob@example.com"));
        assert!(!debug.contains("my-secret-value"));
        assert!(debug.contains("REDACTED"));
    }
}
