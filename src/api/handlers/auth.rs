use crate::types::{LoginRequest, TokenResponse};
use axum::http::StatusCode;

/// Exchange username and password for a bearer token
///
/// Credentials are handled by the login interceptor, which answers directly
/// with the token in both the `Authorization` response header and the body.
/// This handler is only reached when the request already carries a bearer
/// token, in which case nothing is exchanged.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse,
            headers(("Authorization" = String, description = "Bearer <token>"))),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login() -> StatusCode {
    StatusCode::OK
}
