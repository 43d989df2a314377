//! HTTP API Handlers and Routes
//!
//! The REST surface of Warden, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::openapi`](crate::api::openapi) - OpenAPI document
//! - [`api::routes`](crate::api::routes) - Router configuration and layering
//!
//! # API Endpoints
//!
//! ## Public
//! - `POST /login` - Exchange username/password for a bearer token
//! - `GET /health` - Health check endpoint
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! ## Users (`/user`)
//! - `GET /user/me` - Name of the caller (`USER` or `ADMIN`)
//! - `GET /user/all` - List users (`ADMIN`)
//! - `GET /user/{id}` - Get one user (`ADMIN`)
//!
//! # Authentication
//!
//! Guarded endpoints require the token issued by `/login`:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! A missing token yields 401, a token without the needed role 403, and a
//! token that fails validation (bad signature, malformed, expired, or for a
//! deleted user) 406.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document and optional Swagger UI.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
