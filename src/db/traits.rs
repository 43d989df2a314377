//! User store abstraction
//!
//! The authentication core only reads from the store (`find_by_username`,
//! `find_by_id`). The write operations exist for seeding and administration.
//!
//! # Example
//!
//! ```rust,ignore
//! use warden::db::{TursoUserStore, UserStore};
//!
//! let store = TursoUserStore::new_memory().await?;
//! let user = store.create_user("alice", &hash, &["USER".to_string()]).await?;
//! assert!(store.find_by_username("alice").await?.is_some());
//! ```

use crate::types::{Result, UserView};
use async_trait::async_trait;

/// User record from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable numeric identifier
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Argon2 PHC-format password hash
    pub password_hash: String,
    /// Role strings granted to the user
    pub roles: Vec<String>,
}

impl User {
    /// Public projection without the password hash
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Abstract trait for user lookups
///
/// Implementations must be safe to share between concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// List every user ordered by ID
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Create a user; fails on a duplicate username or an empty role list
    async fn create_user(&self, username: &str, password_hash: &str, roles: &[String])
        -> Result<User>;

    /// Delete a user by username, returning whether a row was removed
    async fn delete_user(&self, username: &str) -> Result<bool>;
}
