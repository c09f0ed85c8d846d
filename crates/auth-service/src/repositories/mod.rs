//! Database access layer.

pub mod users;

pub use users::{PgUserStore, UserCredential, UserStore};
