//! API request handlers.
//!
//! Authentication itself happens in the interceptors; the handlers here only
//! see requests that already carry a bound identity (or none).

/// Login endpoint (fall-through when a bearer token is already present).
pub mod auth;
/// User lookup handlers.
pub mod users;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = String)),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "OK"
}
