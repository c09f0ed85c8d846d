//! Business logic layer.

pub mod login_service;
pub mod token_service;

pub use token_service::TokenService;
