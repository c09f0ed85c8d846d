//! Credential verification and token issuance for `POST /auth/login`.

use crate::crypto::{self, DUMMY_PASSWORD_HASH};
use crate::errors::AuthError;
use crate::models::LoginRequest;
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_token_issuance;
use crate::repositories::UserStore;
use crate::services::TokenService;
use common::secret::ExposeSecret;
use tracing::{debug, info, instrument};

/// Verify login credentials and issue an identity token.
///
/// The returned token has `sub = email` and carries the user's role.
///
/// # Errors
///
/// - `AuthError::Validation` - email malformed or password too short
/// - `AuthError::InvalidCredentials` - unknown email or wrong password
/// - `AuthError::Database` / `AuthError::Crypto` - internal failures
#[instrument(skip_all)]
pub async fn login(
    store: &dyn UserStore,
    tokens: &TokenService,
    request: &LoginRequest,
) -> Result<String, AuthError> {
    request.validate()?;

    let email_hash = hash_for_correlation(&request.email);
    let user = store.find_by_email(&request.email).await?;

    // Always run bcrypt so that unknown emails cost the same as wrong passwords
    let hash_to_verify = match &user {
        Some(u) => u.password_hash.as_str(),
        None => DUMMY_PASSWORD_HASH,
    };

    let is_valid = crypto::verify_password(request.password.expose_secret(), hash_to_verify)?;

    let user = match user {
        Some(u) if is_valid => u,
        Some(_) => {
            debug!(target: "auth.services.login", email_hash = %email_hash, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        None => {
            debug!(target: "auth.services.login", email_hash = %email_hash, "Unknown user");
            return Err(AuthError::InvalidCredentials);
        }
    };

    // Issuance is counted only once credentials have been verified
    let token = tokens.issue(&user.email, &user.role).inspect_err(|_| {
        record_token_issuance("error");
    })?;
    record_token_issuance("success");

    info!(
        target: "auth.services.login",
        email_hash = %email_hash,
        role = %user.role,
        "Token issued"
    );

    Ok(token)
}
