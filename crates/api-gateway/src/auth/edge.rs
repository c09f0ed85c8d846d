//! Per-request edge authentication decision.
//!
//! For a request on a filtered route:
//!
//! 0. Path with a dot segment: deny (400) before classification.
//! 1. Public path: allow.
//! 2. `Authorization` header present: allow iff the bearer token is valid.
//! 3. No header: read the body as login credentials, exchange them for a
//!    token with the auth service, and forward the request (body replayed)
//!    iff that token is valid.
//!
//! The decision is computed once per request and holds no state between
//! requests.

use super::{has_dot_segment, Credentials, RouteClass, RouteClassifier};
use crate::errors::GatewayError;
use crate::observability::metrics::record_auth_decision;
use crate::services::CredentialExchange;
use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use common::jwt::TokenValidator;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Maximum request body read when deriving a token from credentials.
pub const MAX_CREDENTIAL_BODY_BYTES: usize = 64 * 1024;

/// Outcome of the edge check.
#[derive(Debug)]
pub enum AuthDecision {
    /// Pass the original request through.
    Allow(Request),
    /// Pass a rebuilt request through (body was consumed and is replayed).
    Forward(Request),
    /// Reject with the status of the reason.
    Deny(DenyReason),
}

impl AuthDecision {
    /// Metrics label for the decision.
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthDecision::Allow(_) => "allow",
            AuthDecision::Forward(_) => "forward",
            AuthDecision::Deny(_) => "deny",
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Path contains a `.` or `..` segment.
    MalformedPath,
    /// `Authorization` header present but not `<scheme> <token>`.
    MalformedHeader,
    /// Token failed signature, format or expiry checks.
    InvalidToken,
    /// No header and an empty body.
    MissingCredentials,
    /// Body is not a credentials JSON object.
    MalformedBody,
    /// Body could not be read (I/O error or over the size cap).
    BodyUnreadable,
    /// The auth service rejected the credentials or could not be reached.
    ExchangeFailed,
}

impl DenyReason {
    /// Metrics label for the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::MalformedPath => "malformed_path",
            DenyReason::MalformedHeader => "malformed_header",
            DenyReason::InvalidToken => "invalid_token",
            DenyReason::MissingCredentials => "missing_credentials",
            DenyReason::MalformedBody => "malformed_body",
            DenyReason::BodyUnreadable => "body_unreadable",
            DenyReason::ExchangeFailed => "exchange_failed",
        }
    }
}

impl From<DenyReason> for GatewayError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::MalformedPath => {
                GatewayError::BadRequest("Invalid request path".to_string())
            }
            DenyReason::MalformedBody => {
                GatewayError::BadRequest("Malformed credentials body".to_string())
            }
            DenyReason::MalformedHeader => {
                GatewayError::InvalidToken("Invalid Authorization header format".to_string())
            }
            DenyReason::InvalidToken => {
                GatewayError::InvalidToken("The access token is invalid or expired".to_string())
            }
            DenyReason::MissingCredentials => {
                GatewayError::InvalidToken("Missing credentials".to_string())
            }
            DenyReason::BodyUnreadable => {
                GatewayError::InvalidToken("Unable to read request body".to_string())
            }
            DenyReason::ExchangeFailed => {
                GatewayError::InvalidToken("Authentication failed".to_string())
            }
        }
    }
}

/// Extract the token from an `Authorization` header value.
///
/// Returns the second whitespace-delimited segment. The scheme itself is not
/// checked.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    header_value.split_whitespace().nth(1)
}

/// Gateway-side authentication filter.
#[derive(Clone)]
pub struct EdgeAuthenticator {
    classifier: RouteClassifier,
    validator: TokenValidator,
    exchange: Arc<dyn CredentialExchange>,
}

impl EdgeAuthenticator {
    pub fn new(
        classifier: RouteClassifier,
        validator: TokenValidator,
        exchange: Arc<dyn CredentialExchange>,
    ) -> Self {
        Self {
            classifier,
            validator,
            exchange,
        }
    }

    /// Decide what happens to `request`.
    ///
    /// Never fails: every error becomes `AuthDecision::Deny`.
    #[instrument(skip_all, name = "gateway.auth.decide")]
    pub async fn decide(&self, request: Request) -> AuthDecision {
        let (decision, reason) = self.evaluate(request).await;

        match &decision {
            AuthDecision::Deny(_) => {
                debug!(target: "gateway.auth.edge", reason, "Request denied");
            }
            _ => {
                debug!(target: "gateway.auth.edge", outcome = decision.outcome(), reason, "Request admitted");
            }
        }
        record_auth_decision(decision.outcome(), reason);

        decision
    }

    async fn evaluate(&self, request: Request) -> (AuthDecision, &'static str) {
        if has_dot_segment(request.uri().path()) {
            return deny(DenyReason::MalformedPath);
        }

        if self.classifier.classify(request.uri().path()) == RouteClass::Public {
            return (AuthDecision::Allow(request), "public_path");
        }

        if let Some(value) = request.headers().get(AUTHORIZATION) {
            let token = match value.to_str().ok().and_then(extract_bearer_token) {
                Some(token) => token,
                None => return deny(DenyReason::MalformedHeader),
            };

            if self.validator.is_invalid(token) {
                return deny(DenyReason::InvalidToken);
            }
            return (AuthDecision::Allow(request), "valid_token");
        }

        self.exchange_credentials(request).await
    }

    async fn exchange_credentials(&self, request: Request) -> (AuthDecision, &'static str) {
        let (parts, body) = request.into_parts();

        let bytes = match to_bytes(body, MAX_CREDENTIAL_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(target: "gateway.auth.edge", error = %e, "Failed to read request body");
                return deny(DenyReason::BodyUnreadable);
            }
        };

        if bytes.is_empty() {
            return deny(DenyReason::MissingCredentials);
        }

        let credentials: Credentials = match serde_json::from_slice(&bytes) {
            Ok(credentials) => credentials,
            Err(e) => {
                // Category only; the parser message may quote the body
                debug!(target: "gateway.auth.edge", category = ?e.classify(), "Invalid credentials JSON");
                return deny(DenyReason::MalformedBody);
            }
        };

        let token = match self.exchange.get_token(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                debug!(target: "gateway.auth.edge", error = %e, "Credential exchange failed");
                return deny(DenyReason::ExchangeFailed);
            }
        };

        if self.validator.is_invalid(&token) {
            return deny(DenyReason::InvalidToken);
        }

        let replayed = Request::from_parts(parts, Body::from(bytes));
        (AuthDecision::Forward(replayed), "credential_exchange")
    }
}

fn deny(reason: DenyReason) -> (AuthDecision, &'static str) {
    (AuthDecision::Deny(reason), reason.as_str())
}
