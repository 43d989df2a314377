//! Authentication and Authorization
//!
//! This module is the request-level security pipeline of Warden: it issues
//! and validates signed bearer tokens, binds the resulting identity to each
//! request, and enforces role requirements on individual routes.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - Token codec and the process-wide signing key
//! - [`auth::credentials`](crate::auth::credentials) - Username/password verification
//! - [`auth::password`](crate::auth::password) - Argon2id hashing
//! - [`auth::middleware`](crate::auth::middleware) - Login and token interceptors, identity extractor
//! - [`auth::guard`](crate::auth::guard) - Role requirements and the guard layer
//!
//! # Request Flow
//!
//! ```text
//! POST /login  --> login_middleware --> CredentialVerifier --> TokenCodec::issue
//!                                       (200 + "Authorization: Bearer <token>" | 401)
//!
//! other paths  --> token_middleware --> TokenCodec::verify --> RequestIdentity
//!                                       (bound | anonymous | 406 on a bad token)
//!              --> require_roles!(..) --> handler  (401 anonymous | 403 missing role)
//! ```
//!
//! # Token Format
//!
//! HS256 JWT with the claims `username`, `role` (list), `user_id` and `exp`
//! (plus `sub` and `iat`). A token is trusted only when its signature
//! verifies, `exp` lies in the future and its principal still exists in the
//! user store. There is no refresh flow and no revocation list; deleting a
//! user is the way to invalidate its outstanding tokens.
//!
//! # Configuration
//!
//! Configure via `warden.toml`:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"  # env var holding the signing secret (>= 32 bytes)
//! jwt_expiry = 3600              # token validity in seconds
//! login_path = "/login"
//! ```

/// Username/password verification.
pub mod credentials;
/// Role requirements and the authorization guard.
pub mod guard;
/// Token issuing and validation.
pub mod jwt;
/// Login and token interceptors and the identity extractor.
pub mod middleware;
/// Password hashing.
pub mod password;

pub use credentials::CredentialVerifier;
pub use guard::{RoleRequirement, ADMIN_ONLY, USER_OR_ADMIN};
pub use jwt::{SigningKey, TokenCodec};
pub use middleware::{CurrentIdentity, RequestIdentity};
