//! Auth service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are generic; the underlying cause is logged
//! server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::ErrorResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Database(_) | AuthError::Crypto(_) => 500,
            AuthError::InvalidCredentials => 401,
            AuthError::Validation(_) => 400,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::Database(err) => {
                tracing::error!(target: "auth.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred".to_string(),
                )
            }
            AuthError::Crypto(err) => {
                tracing::error!(target: "auth.crypto", error = %err, "Cryptographic operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            AuthError::Validation(reason) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", reason.clone())
            }
        };

        let body = ErrorResponse::new(status.as_u16(), code, message);
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
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
            AuthError::Database("connection refused".to_string()).to_string(),
            "Database error: connection refused"
        );
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            AuthError::Validation("Email should be valid".to_string()).to_string(),
            "Validation failed: Email should be valid"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::Database(String::new()).status_code(), 500);
        assert_eq!(AuthError::Crypto(String::new()).status_code(), 500);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::Validation(String::new()).status_code(), 400);
    }

    #[tokio::test]
    async fn test_invalid_credentials_response() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["status"], 401);
        assert_eq!(body["details"], "INVALID_CREDENTIALS");
        assert_eq!(body["message"], "Invalid credentials");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_validation_response_carries_reason() {
        let response =
            AuthError::Validation("Password must be at least 6 characters".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["message"], "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response =
            AuthError::Database("password authentication failed for user".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["message"], "An internal database error occurred");
        assert!(!body.to_string().contains("password authentication"));
    }
}
