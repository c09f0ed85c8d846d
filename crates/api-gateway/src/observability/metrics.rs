//! Metrics definitions for the API gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gateway_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: ~8 values (route prefixes, `/other`)
//! - `status`: 3 values (success, error, timeout)
//! - `outcome`: 3 values (allow, forward, deny)
//! - `reason`: bounded by the edge decision reasons
//! - exchange `status`: 3 values (success, rejected, error)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Exchange includes a bcrypt verification on the auth service
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_credential_exchange".to_string()),
            &[0.050, 0.100, 0.200, 0.500, 1.000, 2.000, 5.000, 10.000],
        )
        .map_err(|e| format!("Failed to set credential exchange buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `gateway_http_requests_total`, `gateway_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("gateway_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("gateway_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=399 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize a request path to its route prefix
///
/// Identifiers in the path (user ids, department codes) never become labels.
fn normalize_endpoint(path: &str) -> &'static str {
    let first_segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
    let has_rest = path.trim_start_matches('/').contains('/');

    match (first_segment, has_rest) {
        ("health", false) => "/health",
        ("metrics", false) => "/metrics",
        ("users", false) => "/users",
        ("users", true) => "/users/*",
        ("departments", false) => "/departments",
        ("departments", true) => "/departments/*",
        ("auth", true) => "/auth/*",
        _ => "/other",
    }
}

// ============================================================================
// Edge Authentication Metrics
// ============================================================================

/// Record an edge authentication decision
///
/// Metric: `gateway_auth_decisions_total`
/// Labels: `outcome`, `reason`
pub fn record_auth_decision(outcome: &'static str, reason: &'static str) {
    counter!("gateway_auth_decisions_total",
        "outcome" => outcome,
        "reason" => reason
    )
    .increment(1);
}

/// Record a credential exchange call against the auth service
///
/// Metric: `gateway_credential_exchange_total`, `gateway_credential_exchange_duration_seconds`
/// Labels: `status`
pub fn record_credential_exchange(status: &'static str, duration: Duration) {
    histogram!("gateway_credential_exchange_duration_seconds", "status" => status)
        .record(duration.as_secs_f64());

    counter!("gateway_credential_exchange_total", "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_status_code() {
        assert_eq!(categorize_status_code(200), "success");
        assert_eq!(categorize_status_code(204), "success");
        assert_eq!(categorize_status_code(304), "success");
        assert_eq!(categorize_status_code(400), "error");
        assert_eq!(categorize_status_code(401), "error");
        assert_eq!(categorize_status_code(502), "error");
        assert_eq!(categorize_status_code(408), "timeout");
        assert_eq!(categorize_status_code(504), "timeout");
    }

    #[test]
    fn test_normalize_static_endpoints() {
        assert_eq!(normalize_endpoint("/health"), "/health");
        assert_eq!(normalize_endpoint("/metrics"), "/metrics");
        assert_eq!(normalize_endpoint("/users"), "/users");
        assert_eq!(normalize_endpoint("/departments"), "/departments");
    }

    #[test]
    fn test_normalize_dynamic_endpoints() {
        assert_eq!(normalize_endpoint("/users/42"), "/users/*");
        assert_eq!(normalize_endpoint("/users/email/ada@example.com"), "/users/*");
        assert_eq!(normalize_endpoint("/departments/ENG"), "/departments/*");
        assert_eq!(normalize_endpoint("/auth/login"), "/auth/*");
    }

    #[test]
    fn test_normalize_unknown_endpoints() {
        assert_eq!(normalize_endpoint("/"), "/other");
        assert_eq!(normalize_endpoint("/auth"), "/other");
        assert_eq!(normalize_endpoint("/admin/secret"), "/other");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/users/1", 200, Duration::from_millis(5));
        record_auth_decision("deny", "invalid_token");
        record_credential_exchange("success", Duration::from_millis(80));
    }
}
