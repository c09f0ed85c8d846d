use crate::errors::AuthError;
use crate::models::LoginRequest;
use crate::observability::metrics::{record_error, record_login};
use crate::observability::ErrorCategory;
use crate::routes::AppState;
use crate::services::login_service;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

/// Handle login request
///
/// POST /auth/login
///
/// Responds with the bare token as `text/plain`.
#[tracing::instrument(skip_all, name = "auth.handlers.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let start = Instant::now();

    let result = match payload {
        Ok(Json(request)) => {
            login_service::login(state.user_store.as_ref(), &state.token_service, &request).await
        }
        Err(rejection) => {
            tracing::debug!(target: "auth.handlers.login", error = %rejection, "Rejected login body");
            Err(AuthError::Validation("Malformed request body".to_string()))
        }
    };

    let status = if result.is_ok() { "success" } else { "error" };
    record_login(status, start.elapsed());

    match result {
        Ok(token) => Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], token)),
        Err(e) => {
            record_error("login", ErrorCategory::from(&e).as_str(), e.status_code());
            Err(e)
        }
    }
}
