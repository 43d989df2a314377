//! User persistence.
//!
//! - [`UserStore`]: the lookup contract the authentication core depends on
//! - [`TursoUserStore`]: libsql implementation (in-memory or file-based SQLite)
//! - [`seed_users`]: inserts the `[[users]]` entries from the configuration

pub mod seed;
pub mod traits;
pub mod turso;

pub use seed::seed_users;
pub use traits::{User, UserStore};
pub use turso::TursoUserStore;
