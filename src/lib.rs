//! # Warden - token authentication and role-based access for axum services
//!
//! Warden turns a username/password login into a signed, self-contained
//! bearer token, validates that token on every later request, and lets
//! individual routes declare which roles may call them.
//!
//! ## Overview
//!
//! Warden can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `warden-server` binary
//! 2. **As a library** - Put its interceptors and guards in front of your own routes
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden::{api::routes::create_router, AppState, TursoUserStore, WardenConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WardenConfig::load("warden.toml")?;
//!     let secret = config.jwt_secret()?;
//!     let users = Arc::new(TursoUserStore::new_memory().await?);
//!
//!     let app = create_router(AppState::new(config, secret, users));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ### Guarding Your Own Routes
//!
//! ```rust,ignore
//! use warden::auth::guard::roles::ADMIN;
//! use warden::require_roles;
//!
//! let admin = Router::new()
//!     .route("/reports", get(reports).route_layer(require_roles!(ADMIN)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `swagger-ui` | Serve Swagger UI at `/swagger-ui` |
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers, routes and OpenAPI document
//! - [`auth`] - Token codec, credential verifier, interceptors and role guard
//! - [`cli`] - Command-line interface of the `warden-server` binary
//! - [`db`] - User store abstraction and its libsql implementation
//! - [`types`] - Common types and error handling
//! - [`utils`] - TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Token authentication, interceptors and role guard.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// User store.
pub mod db;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{CredentialVerifier, RequestIdentity, RoleRequirement, TokenCodec};
pub use db::{TursoUserStore, User, UserStore};
pub use types::{AppError, AuthError, Identity, Result};
pub use utils::toml_config::WardenConfig;

use std::sync::Arc;

/// Application state shared across interceptors and handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<WardenConfig>,
    /// User store backing login and token validation
    pub users: Arc<dyn UserStore>,
    /// Username/password verifier
    pub credentials: Arc<CredentialVerifier>,
    /// Token issuing and validation
    pub tokens: Arc<TokenCodec>,
}

impl AppState {
    /// Builds the shared state. The signing key is derived lazily from
    /// `secret` the first time a token is issued or checked.
    pub fn new(config: WardenConfig, secret: impl Into<String>, users: Arc<dyn UserStore>) -> Self {
        let tokens = TokenCodec::new(secret, config.auth.jwt_expiry, users.clone());
        Self {
            credentials: Arc::new(CredentialVerifier::new(users.clone())),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            users,
        }
    }
}
