//! Clients for services behind the gateway.

pub mod auth_client;

pub use auth_client::{AuthClient, CredentialExchange};
