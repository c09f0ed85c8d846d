//! HTTP routes for the API gateway.
//!
//! | path | upstream | edge filter |
//! |---|---|---|
//! | `/users`, `/users/*` | user service | yes |
//! | `/departments`, `/departments/*` | department service | yes |
//! | `/auth/*` | auth service | no |
//! | `/health`, `/metrics` | gateway | no |

use crate::auth::{EdgeAuthenticator, RouteClassifier};
use crate::config::Config;
use crate::errors::GatewayError;
use crate::handlers::{self, ProxyTarget};
use crate::middleware::{authenticate, http_metrics_middleware};
use crate::services::AuthClient;
use axum::{middleware, routing::any, routing::get, Router};
use common::jwt::{SigningSecret, TokenValidator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    /// Edge filter for `/users` and `/departments`.
    pub authenticator: Arc<EdgeAuthenticator>,

    pub user_service: Arc<ProxyTarget>,

    pub department_service: Arc<ProxyTarget>,

    /// Reached without the edge filter so that clients can log in.
    pub auth_service: Arc<ProxyTarget>,
}

impl AppState {
    /// Wire the edge filter and upstream clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if an HTTP client cannot be built.
    pub fn from_config(config: &Config, secret: Arc<SigningSecret>) -> Result<Self, GatewayError> {
        let exchange = Arc::new(AuthClient::new(config.auth_service_url.clone())?);
        let authenticator = EdgeAuthenticator::new(
            RouteClassifier::new(config.public_paths.clone()),
            TokenValidator::new(secret),
            exchange,
        );

        Ok(Self {
            authenticator: Arc::new(authenticator),
            user_service: Arc::new(ProxyTarget::new(
                "user-service",
                config.user_service_url.clone(),
            )?),
            department_service: Arc::new(ProxyTarget::new(
                "department-service",
                config.department_service_url.clone(),
            )?),
            auth_service: Arc::new(ProxyTarget::new(
                "auth-service",
                config.auth_service_url.clone(),
            )?),
        })
    }
}

/// Build the gateway router.
pub fn build_routes(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let user_routes = Router::new()
        .route("/users", any(handlers::forward))
        .route("/users/*rest", any(handlers::forward))
        .with_state(state.user_service);

    let department_routes = Router::new()
        .route("/departments", any(handlers::forward))
        .route("/departments/*rest", any(handlers::forward))
        .with_state(state.department_service);

    // Edge filter applies only to matched routes, so 404/405 are unaffected
    let filtered_routes = user_routes
        .merge(department_routes)
        .route_layer(middleware::from_fn_with_state(
            state.authenticator,
            authenticate,
        ));

    let auth_routes = Router::new()
        .route("/auth/*rest", any(handlers::forward))
        .with_state(state.auth_service);

    let gateway_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. http_metrics_middleware - Record ALL responses (outermost)
    filtered_routes
        .merge(auth_routes)
        .merge(gateway_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::services::auth_client::mock::MockCredentialExchange;
    use auth_test_utils::{test_signing_secret, test_validator, TestTokenBuilder};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::collections::HashMap;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(upstream: &str, exchange: MockCredentialExchange) -> AppState {
        let target = |name| Arc::new(ProxyTarget::new(name, upstream.to_string()).unwrap());
        AppState {
            authenticator: Arc::new(EdgeAuthenticator::new(
                RouteClassifier::default(),
                test_validator(),
                Arc::new(exchange),
            )),
            user_service: target("user-service"),
            department_service: target("department-service"),
            auth_service: target("auth-service"),
        }
    }

    fn app(upstream: &str, exchange: MockCredentialExchange) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        build_routes(state(upstream, exchange), handle)
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_from_config_wires_state() {
        let vars: HashMap<String, String> = [(
            "TOKEN_SECRET_KEY".to_string(),
            "gatekeeper-test-secret-key-0123456789abcdef".to_string(),
        )]
        .into_iter()
        .collect();
        let config = Config::from_vars(&vars).unwrap();

        let state = AppState::from_config(&config, test_signing_secret()).unwrap();

        assert_eq!(state.user_service.name(), "user-service");
        assert_eq!(state.user_service.base_url(), config.user_service_url);
        assert_eq!(state.auth_service.base_url(), config.auth_service_url);
    }

    #[tokio::test]
    async fn test_health_is_unfiltered() {
        let response = app("http://127.0.0.1:1", MockCredentialExchange::failing())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_is_unfiltered() {
        let response = app("http://127.0.0.1:1", MockCredentialExchange::failing())
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_users_without_credentials_is_unauthorized() {
        let response = app("http://127.0.0.1:1", MockCredentialExchange::failing())
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_departments_with_token_is_forwarded() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/departments/HR"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Human Resources"))
            .expect(1)
            .mount(&upstream)
            .await;

        let token = TestTokenBuilder::new().sign();
        let request = Request::builder()
            .uri("/departments/HR")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app(&upstream.uri(), MockCredentialExchange::failing())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_routes_bypass_edge_filter() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("token"))
            .expect(1)
            .mount(&upstream)
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .body(Body::from(r#"{"email":"a@b.com","password":"secret1"}"#))
            .unwrap();

        let response = app(&upstream.uri(), MockCredentialExchange::failing())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = app("http://127.0.0.1:1", MockCredentialExchange::failing())
            .oneshot(Request::builder().uri("/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
