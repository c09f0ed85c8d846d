//! User credential lookups.
//!
//! The `users` table is owned by the user service. The auth service only reads
//! the columns it needs to verify a login: `email`, `password` (bcrypt hash)
//! and `role`.

use crate::errors::AuthError;
use async_trait::async_trait;
use sqlx::PgPool;
use std::fmt;

/// Credential view of a user row.
#[derive(Clone, sqlx::FromRow)]
pub struct UserCredential {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Lookup of user credentials by email.
///
/// Allows the login flow to be tested without a database.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the credential record for `email`, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, AuthError>;
}

/// PostgreSQL-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, AuthError> {
        let user = sqlx::query_as::<_, UserCredential>(
            r#"
            SELECT email, password AS password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to fetch user by email: {}", e)))?;

        Ok(user)
    }
}

/// In-memory user store for tests and local runs.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct InMemoryUserStore {
        users: HashMap<String, UserCredential>,
        lookup_count: AtomicUsize,
        fail: bool,
    }

    impl InMemoryUserStore {
        /// Create an empty store.
        pub fn new() -> Self {
            Self {
                users: HashMap::new(),
                lookup_count: AtomicUsize::new(0),
                fail: false,
            }
        }

        /// Create a store whose every lookup fails with a database error.
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        /// Add a user with an already-hashed password.
        pub fn with_user(mut self, email: &str, password_hash: &str, role: &str) -> Self {
            self.users.insert(
                email.to_string(),
                UserCredential {
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    role: role.to_string(),
                },
            );
            self
        }

        /// Number of lookups performed.
        pub fn lookup_count(&self) -> usize {
            self.lookup_count.load(Ordering::SeqCst)
        }
    }

    impl Default for InMemoryUserStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserCredential>, AuthError> {
            self.lookup_count.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                return Err(AuthError::Database("in-memory store unavailable".to_string()));
            }

            Ok(self.users.get(email).cloned())
        }
    }
}
