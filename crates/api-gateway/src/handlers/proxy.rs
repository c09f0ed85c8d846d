//! Reverse proxy to the services behind the gateway.
//!
//! Copies method, path, query, end-to-end headers and body to the upstream
//! and relays its status, headers and body back. Hop-by-hop headers are
//! dropped in both directions.

use crate::auth::has_dot_segment;
use crate::errors::GatewayError;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap},
    response::Response,
};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Maximum request body forwarded upstream.
pub const MAX_PROXY_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Upstream request timeout in seconds.
const UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upstream connect timeout in seconds.
const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Headers that apply to a single connection and are never forwarded.
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// One upstream service.
pub struct ProxyTarget {
    client: Client,
    base_url: String,
    name: &'static str,
}

impl ProxyTarget {
    /// Create a target for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the HTTP client cannot be built.
    pub fn new(name: &'static str, base_url: String) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(UPSTREAM_REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(UPSTREAM_CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                error!(target: "gateway.handlers.proxy", error = %e, "Failed to build HTTP client");
                GatewayError::Internal
            })?;

        Ok(Self {
            client,
            base_url,
            name,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Copy end-to-end headers, dropping hop-by-hop ones plus `host` and
/// `content-length` (both recomputed for the new connection).
fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| {
            **name != header::HOST
                && **name != header::CONTENT_LENGTH
                && !HOP_BY_HOP_HEADERS.contains(&name.as_str())
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Forward `req` to the target service.
///
/// # Errors
///
/// - `GatewayError::BadRequest` if the path has a dot segment (the client
///   would resolve it to a different upstream path) or the body exceeds the
///   forwarding cap
/// - `GatewayError::BadGateway` if the upstream cannot be reached or its
///   response cannot be read
#[instrument(skip_all, name = "gateway.handlers.proxy")]
pub async fn forward(
    State(target): State<Arc<ProxyTarget>>,
    req: Request,
) -> Result<Response, GatewayError> {
    let (parts, body) = req.into_parts();

    if has_dot_segment(parts.uri.path()) {
        debug!(target: "gateway.handlers.proxy", upstream = target.name, "Rejected dot segment path");
        return Err(GatewayError::BadRequest("Invalid request path".to_string()));
    }

    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let url = format!("{}{}", target.base_url, path_and_query);

    let body = to_bytes(body, MAX_PROXY_BODY_BYTES)
        .await
        .map_err(|e| {
            debug!(target: "gateway.handlers.proxy", error = %e, "Failed to read request body");
            GatewayError::BadRequest("Request body too large or unreadable".to_string())
        })?;

    let upstream = target
        .client
        .request(parts.method.clone(), &url)
        .headers(end_to_end_headers(&parts.headers))
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!(target: "gateway.handlers.proxy", upstream = target.name, error = %e, "Upstream request failed");
            GatewayError::BadGateway(format!("{} unreachable", target.name))
        })?;

    let status = upstream.status();
    let headers = end_to_end_headers(upstream.headers());
    let bytes = upstream.bytes().await.map_err(|e| {
        warn!(target: "gateway.handlers.proxy", upstream = target.name, error = %e, "Failed to read upstream body");
        GatewayError::BadGateway(format!("{} response unreadable", target.name))
    })?;

    debug!(target: "gateway.handlers.proxy", upstream = target.name, status = %status, "Upstream responded");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
