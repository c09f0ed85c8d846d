//! Test server harness for E2E testing
//!
//! Provides `TestAuthServer` for spawning real auth service instances in
//! tests, backed by an in-memory user store.

use crate::crypto_fixtures::{test_password_hash, test_signing_secret};
use auth_service::repositories::users::mock::InMemoryUserStore;
use auth_service::routes::{self, AppState};
use auth_service::services::TokenService;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default token lifetime for spawned servers.
pub const TEST_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Test harness for spawning the auth service in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_flow_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn_with_user("ada@example.com", "password123", "ADMIN").await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .post(format!("{}/auth/login", server.url()))
///         .json(&serde_json::json!({"email": "ada@example.com", "password": "password123"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server over `store`, signing with the shared test secret.
    ///
    /// The server binds to a random available port (127.0.0.1:0).
    pub async fn spawn(store: InMemoryUserStore) -> Result<Self, anyhow::Error> {
        Self::spawn_with_ttl(store, TEST_TOKEN_TTL).await
    }

    /// Spawn a server with one user whose password is hashed at test cost.
    pub async fn spawn_with_user(
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<Self, anyhow::Error> {
        let store = InMemoryUserStore::new().with_user(email, &test_password_hash(password), role);
        Self::spawn(store).await
    }

    /// Spawn a server issuing tokens with lifetime `ttl`.
    pub async fn spawn_with_ttl(
        store: InMemoryUserStore,
        ttl: Duration,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState {
            user_store: Arc::new(store),
            token_service: TokenService::new(test_signing_secret(), ttl),
        });

        // Local recorder; installing a global one would clash between tests
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        // Build routes using the auth service's real route builder
        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        // Abort the server task so the port is released immediately
        self._handle.abort();
    }
}
