//! Edge authentication middleware for filtered routes.
//!
//! Runs the [`EdgeAuthenticator`] once per request and maps its decision to
//! either the next layer or a terminal error response.

use crate::auth::{AuthDecision, EdgeAuthenticator};
use crate::errors::GatewayError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Authentication middleware applied with `route_layer` to filtered routes.
///
/// # Response
///
/// - 401 with `WWW-Authenticate` for missing, invalid or unobtainable tokens
/// - 400 for a credentials body that is not valid JSON
/// - Otherwise the upstream response
pub async fn authenticate(
    State(authenticator): State<Arc<EdgeAuthenticator>>,
    req: Request,
    next: Next,
) -> Response {
    match authenticator.decide(req).await {
        AuthDecision::Allow(req) | AuthDecision::Forward(req) => next.run(req).await,
        AuthDecision::Deny(reason) => GatewayError::from(reason).into_response(),
    }
}
