//! API gateway configuration.
//!
//! Configuration is loaded from environment variables. The signing key is
//! redacted in Debug output.

use common::jwt::{JwtConfigError, SigningSecret};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default gateway bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default auth service base URL.
pub const DEFAULT_AUTH_SERVICE_URL: &str = "http://localhost:8082";

/// Default user service base URL.
pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:8081";

/// Default department service base URL.
pub const DEFAULT_DEPARTMENT_SERVICE_URL: &str = "http://localhost:8083";

/// Default public path pattern.
pub const DEFAULT_PUBLIC_PATHS: &str = "/login";

/// Default graceful shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 30;

/// API gateway configuration.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Shared HMAC key used to validate identity tokens.
    pub token_secret_key: SecretString,

    /// Base URL of the auth service (credential exchange and `/auth/*`).
    pub auth_service_url: String,

    /// Base URL of the user service (`/users/*`).
    pub user_service_url: String,

    /// Base URL of the department service (`/departments/*`).
    pub department_service_url: String,

    /// Path substrings that mark a filtered route as public.
    pub public_paths: Vec<String>,

    /// Seconds to wait after a shutdown signal before exiting.
    pub drain_seconds: u64,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("token_secret_key", &"[REDACTED]")
            .field("auth_service_url", &self.auth_service_url)
            .field("user_service_url", &self.user_service_url)
            .field("department_service_url", &self.department_service_url)
            .field("public_paths", &self.public_paths)
            .field("drain_seconds", &self.drain_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid token secret key: {0}")]
    InvalidSecretKey(#[from] JwtConfigError),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let token_secret_key = vars
            .get("TOKEN_SECRET_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("TOKEN_SECRET_KEY".to_string()))?;

        SigningSecret::from_config_value(token_secret_key)?;

        let get_or = |name: &str, default: &str| -> String {
            vars.get(name).cloned().unwrap_or_else(|| default.to_string())
        };

        let public_paths = parse_public_paths(&get_or("GATEWAY_PUBLIC_PATHS", DEFAULT_PUBLIC_PATHS));
        if public_paths.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "GATEWAY_PUBLIC_PATHS".to_string(),
                reason: "at least one pattern is required".to_string(),
            });
        }

        let drain_seconds = match vars.get("GATEWAY_DRAIN_SECONDS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: "GATEWAY_DRAIN_SECONDS".to_string(),
                reason: format!("{e}"),
            })?,
            None => DEFAULT_DRAIN_SECONDS,
        };

        Ok(Config {
            bind_address: get_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            token_secret_key: SecretString::from(token_secret_key.clone()),
            auth_service_url: parse_base_url(vars, "AUTH_SERVICE_URL", DEFAULT_AUTH_SERVICE_URL)?,
            user_service_url: parse_base_url(vars, "USER_SERVICE_URL", DEFAULT_USER_SERVICE_URL)?,
            department_service_url: parse_base_url(
                vars,
                "DEPARTMENT_SERVICE_URL",
                DEFAULT_DEPARTMENT_SERVICE_URL,
            )?,
            public_paths,
            drain_seconds,
        })
    }

    /// Build the signing secret from the configured key.
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigError> {
        Ok(SigningSecret::from_config_value(
            self.token_secret_key.expose_secret(),
        )?)
    }
}

fn parse_public_paths(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_base_url(
    vars: &HashMap<String, String>,
    name: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let value = vars.get(name).map_or(default, String::as_str).trim();

    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: "must be an http:// or https:// URL".to_string(),
        });
    }

    Ok(value.trim_end_matches('/').to_string())
}
