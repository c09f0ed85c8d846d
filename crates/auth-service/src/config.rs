use common::jwt::{JwtConfigError, SigningSecret};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default token lifetime in milliseconds (1 hour).
pub const DEFAULT_TOKEN_EXPIRATION_MS: u64 = 3_600_000;

/// Shortest accepted token lifetime in milliseconds.
///
/// Token timestamps have one-second resolution, so anything shorter would
/// produce tokens that are expired on issue.
pub const MIN_TOKEN_EXPIRATION_MS: u64 = 1_000;

/// Default bind address for the auth service.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8082";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub token_secret_key: SecretString,
    pub token_expiration: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("token_secret_key", &"[REDACTED]")
            .field("token_expiration", &self.token_expiration)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token secret key: {0}")]
    InvalidSecretKey(#[from] JwtConfigError),

    #[error("Invalid token expiration time: {0}")]
    InvalidExpiration(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let token_secret_key = vars
            .get("TOKEN_SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("TOKEN_SECRET_KEY".to_string()))?;

        // Reject a weak key here rather than on the first login
        SigningSecret::from_config_value(token_secret_key)?;

        let expiration_ms = match vars.get("TOKEN_EXPIRATION_TIME") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidExpiration(format!("'{value}' is not a number of milliseconds: {e}"))
            })?,
            None => DEFAULT_TOKEN_EXPIRATION_MS,
        };

        if expiration_ms < MIN_TOKEN_EXPIRATION_MS {
            return Err(ConfigError::InvalidExpiration(format!(
                "must be at least {MIN_TOKEN_EXPIRATION_MS}ms, got {expiration_ms}ms"
            )));
        }

        Ok(Config {
            database_url,
            bind_address,
            token_secret_key: SecretString::from(token_secret_key.clone()),
            token_expiration: Duration::from_millis(expiration_ms),
        })
    }

    /// Build the signing secret from the configured key.
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigError> {
        Ok(SigningSecret::from_config_value(
            self.token_secret_key.expose_secret(),
        )?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-bytes!";

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://localhost/test".to_string(),
            ),
            ("TOKEN_SECRET_KEY".to_string(), TEST_SECRET.to_string()),
        ])
    }

    #[test]
    fn test_from_vars_success() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("TOKEN_EXPIRATION_TIME".to_string(), "60000".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.database_url, "postgresql://localhost/test");
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.token_expiration, Duration::from_secs(60));
        assert_eq!(config.token_secret_key.expose_secret(), TEST_SECRET);
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.token_expiration, Duration::from_secs(3600));
    }

    #[test]
    fn test_from_vars_missing_database_url() {
        let mut vars = base_vars();
        vars.remove("DATABASE_URL");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "DATABASE_URL"));
    }

    #[test]
    fn test_from_vars_missing_secret_key() {
        let mut vars = base_vars();
        vars.remove("TOKEN_SECRET_KEY");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "TOKEN_SECRET_KEY"));
    }

    #[test]
    fn test_from_vars_secret_key_too_short() {
        let mut vars = base_vars();
        vars.insert("TOKEN_SECRET_KEY".to_string(), "short".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSecretKey(JwtConfigError::SecretTooShort { .. }))
        ));
    }

    #[test]
    fn test_from_vars_expiration_not_a_number() {
        let mut vars = base_vars();
        vars.insert("TOKEN_EXPIRATION_TIME".to_string(), "1h".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidExpiration(_))));
    }

    #[test]
    fn test_from_vars_expiration_below_minimum() {
        let mut vars = base_vars();
        vars.insert("TOKEN_EXPIRATION_TIME".to_string(), "999".to_string());

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidExpiration(_))));
    }

    #[test]
    fn test_signing_secret_from_config() {
        let config = Config::from_vars(&base_vars()).unwrap();
        assert!(config.signing_secret().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_vars(&base_vars()).unwrap();
        let debug_str = format!("{config:?}");

        assert!(!debug_str.contains(TEST_SECRET));
        assert!(!debug_str.contains("postgresql://"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
