//! Edge authentication for filtered gateway routes.
//!
//! - `route_classifier`: public vs protected path classification
//! - `edge`: the per-request decision (`AuthDecision`)

pub mod edge;
pub mod route_classifier;

pub use edge::{extract_bearer_token, AuthDecision, DenyReason, EdgeAuthenticator};
pub use route_classifier::{has_dot_segment, RouteClass, RouteClassifier};

use common::secret::SecretString;
use serde::Deserialize;

/// Login credentials carried in the body of an unauthenticated request.
///
/// `Debug` redacts the password.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}
