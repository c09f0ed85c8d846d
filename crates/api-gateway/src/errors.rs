//! API gateway error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are generic; causes are logged server-side.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::error::ErrorResponse;
use thiserror::Error;

/// `WWW-Authenticate` challenge attached to every 401.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = "Bearer realm=\"gatekeeper\", error=\"invalid_token\"";

/// API gateway error type.
///
/// Maps to HTTP status codes:
/// - InvalidToken: 401 Unauthorized
/// - BadRequest: 400 Bad Request
/// - BadGateway: 502 Bad Gateway
/// - ServiceUnavailable: 503 Service Unavailable
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

impl GatewayError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            GatewayError::InvalidToken(reason) => ("INVALID_TOKEN", reason.clone()),
            GatewayError::BadRequest(reason) => ("BAD_REQUEST", reason.clone()),
            GatewayError::BadGateway(reason) => {
                tracing::warn!(target: "gateway.upstream", reason = %reason, "Upstream request failed");
                ("BAD_GATEWAY", "Upstream service error".to_string())
            }
            GatewayError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "gateway.availability", reason = %reason, "Service unavailable");
                (
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            GatewayError::Internal => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let body = ErrorResponse::new(status.as_u16(), code, message);
        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
            );
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GatewayError::InvalidToken("expired".to_string()).to_string(),
            "Invalid token: expired"
        );
        assert_eq!(
            GatewayError::BadRequest("bad json".to_string()).to_string(),
            "Bad request: bad json"
        );
        assert_eq!(GatewayError::Internal.to_string(), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GatewayError::InvalidToken(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::BadRequest(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::BadGateway(String::new()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            GatewayError::ServiceUnavailable(String::new()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            GatewayError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_token_has_challenge_header() {
        let response = GatewayError::InvalidToken("Missing credentials".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            WWW_AUTHENTICATE_CHALLENGE
        );

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["details"], "INVALID_TOKEN");
        assert_eq!(body["message"], "Missing credentials");
    }

    #[tokio::test]
    async fn test_bad_request_has_no_challenge_header() {
        let response = GatewayError::BadRequest("Malformed credentials body".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_bad_gateway_hides_reason() {
        let response =
            GatewayError::BadGateway("connection refused to 10.0.0.7:8081".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["message"], "Upstream service error");
        assert!(!body.to_string().contains("10.0.0.7"));
    }
}
