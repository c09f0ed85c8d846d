//! HTTP routes for the auth service.

use crate::handlers;
use crate::repositories::UserStore;
use crate::services::TokenService;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Credential lookup (PostgreSQL in production).
    pub user_store: Arc<dyn UserStore>,

    /// Token issuer holding the shared signing secret.
    pub token_service: TokenService,
}

/// Build the application routes.
///
/// - `POST /auth/login` - verify credentials, return a bare token
/// - `GET /health` - liveness probe
/// - `GET /metrics` - Prometheus scrape endpoint
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(handlers::handle_login))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    auth_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
