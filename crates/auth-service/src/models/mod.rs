use crate::errors::AuthError;
use common::secret::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Minimum accepted password length for a login attempt.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Body of `POST /auth/login`.
///
/// `Debug` redacts the password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

impl LoginRequest {
    /// Check field constraints before touching the user store.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::Validation("Email should be valid".to_string()));
        }

        let password = self.password.expose_secret();
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        Ok(())
    }
}

/// Basic email format check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }

    domain_parts.iter().all(|p| !p.is_empty())
}
