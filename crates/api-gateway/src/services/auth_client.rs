//! Auth service HTTP client for credential exchange.
//!
//! When a protected request arrives without an `Authorization` header, the
//! gateway posts the credentials from its body to `POST /auth/login` and
//! validates the token that comes back.
//!
//! # Security
//!
//! - The password is exposed only while serializing the outbound body
//! - Timeouts prevent hanging connections
//! - Errors are logged server-side with generic messages returned

use crate::auth::Credentials;
use crate::errors::GatewayError;
use crate::observability::metrics::record_credential_exchange;
use async_trait::async_trait;
use common::secret::ExposeSecret;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{error, instrument, warn};

/// Default timeout for auth service requests in seconds.
const AUTH_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Connect timeout for auth service requests in seconds.
const AUTH_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Exchanges login credentials for an identity token.
#[async_trait]
pub trait CredentialExchange: Send + Sync {
    /// Obtain a token for `credentials`.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidToken` if the auth service rejects the credentials
    /// - `GatewayError::ServiceUnavailable` if the auth service is unreachable or fails
    async fn get_token(&self, credentials: &Credentials) -> Result<String, GatewayError>;
}

/// Outbound login body.
#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

/// HTTP client for the auth service login endpoint.
#[derive(Clone)]
pub struct AuthClient {
    /// HTTP client with configured timeouts.
    client: Client,

    /// Base URL of the auth service.
    base_url: String,
}

impl AuthClient {
    /// Create a new auth service client.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(AUTH_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(AUTH_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                error!(target: "gateway.services.auth_client", error = %e, "Failed to build HTTP client");
                GatewayError::Internal
            })?;

        Ok(Self { client, base_url })
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();

        if status.is_success() {
            let token = response.text().await.map_err(|e| {
                warn!(target: "gateway.services.auth_client", error = %e, "Failed to read token body");
                GatewayError::ServiceUnavailable("Invalid response from auth service".to_string())
            })?;
            return Ok(token.trim().to_string());
        }

        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => {
                warn!(target: "gateway.services.auth_client", status = %status, "Credential exchange rejected");
                Err(GatewayError::InvalidToken("Authentication failed".to_string()))
            }
            _ => {
                error!(target: "gateway.services.auth_client", status = %status, "Auth service returned error");
                Err(GatewayError::ServiceUnavailable(format!(
                    "Auth service returned {status}"
                )))
            }
        }
    }
}

#[async_trait]
impl CredentialExchange for AuthClient {
    #[instrument(skip_all, name = "gateway.services.auth_client.get_token")]
    async fn get_token(&self, credentials: &Credentials) -> Result<String, GatewayError> {
        let url = format!("{}/auth/login", self.base_url);
        let start = Instant::now();

        let payload = LoginPayload {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };

        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(target: "gateway.services.auth_client", error = %e, "Auth service request failed");
                record_credential_exchange("error", start.elapsed());
                return Err(GatewayError::ServiceUnavailable(
                    "Auth service is unavailable".to_string(),
                ));
            }
        };

        let result = self.handle_response(response).await;
        let status = match &result {
            Ok(_) => "success",
            Err(GatewayError::InvalidToken(_)) => "rejected",
            Err(_) => "error",
        };
        record_credential_exchange(status, start.elapsed());

        result
    }
}

/// Mock credential exchange for testing.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed token or a fixed failure.
    pub struct MockCredentialExchange {
        token: Option<String>,
        call_count: AtomicUsize,
    }

    impl MockCredentialExchange {
        /// Create a mock that returns `token` for any credentials.
        pub fn returning(token: impl Into<String>) -> Self {
            Self {
                token: Some(token.into()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Create a mock that rejects every credential set.
        pub fn failing() -> Self {
            Self {
                token: None,
                call_count: AtomicUsize::new(0),
            }
        }

        /// Get the number of calls made.
        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialExchange for MockCredentialExchange {
        async fn get_token(&self, _credentials: &Credentials) -> Result<String, GatewayError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match &self.token {
                Some(token) => Ok(token.clone()),
                None => Err(GatewayError::InvalidToken(
                    "Authentication failed".to_string(),
                )),
            }
        }
    }
}
