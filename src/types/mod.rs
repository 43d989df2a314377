use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= Authentication Types =============

/// Username/password pair read from the login request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned alongside the `Authorization` header on a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Claims carried inside a signed token.
///
/// `username`, `role`, `user_id` and `exp` form the contract between the
/// token codec and the authorization guard. `sub` mirrors the username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Vec<String>,
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

/// An authenticated principal and its role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub principal: String,
    pub roles: Vec<String>,
    pub user_id: i64,
}

impl Identity {
    pub fn new(principal: impl Into<String>, roles: Vec<String>, user_id: i64) -> Self {
        Self {
            principal: principal.into(),
            roles,
            user_id,
        }
    }

    /// True when at least one of `roles` is held by this identity.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        self.roles
            .iter()
            .any(|held| roles.iter().any(|wanted| held == wanted.as_ref()))
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            principal: claims.username,
            roles: claims.role,
            user_id: claims.user_id,
        }
    }
}

// ============= User Types =============

/// Public view of a stored user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

// ============= Error Types =============

/// Failures of the authentication and authorization pipeline.
///
/// The four token kinds share one outward response; the distinction only
/// shows up in logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("bad credentials")]
    BadCredentials,

    #[error("token signature does not verify")]
    InvalidSignature,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("token expired")]
    Expired,

    #[error("token principal no longer exists")]
    PrincipalGone,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("forbidden: insufficient role")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AuthError::BadCredentials | AuthError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::InvalidSignature
            | AuthError::MalformedToken(_)
            | AuthError::Expired
            | AuthError::PrincipalGone => StatusCode::NOT_ACCEPTABLE,
        }
    }

    /// Message shown to the caller.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::BadCredentials => "Invalid credentials",
            AuthError::InvalidSignature
            | AuthError::MalformedToken(_)
            | AuthError::Expired
            | AuthError::PrincipalGone => "Invalid token",
            AuthError::NotAuthenticated => "Authentication required",
            AuthError::Forbidden => "Access denied: insufficient role",
        }
    }

    /// True for the failures that make a presented token untrusted.
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature
                | AuthError::MalformedToken(_)
                | AuthError::Expired
                | AuthError::PrincipalGone
        )
    }
}

/// Body message for server-side failures; the detail only goes to the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, message) = match self {
            AppError::Auth(err) => (err.status(), err.client_message().to_string()),
            AppError::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        AppError::Auth(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};
    use rstest::rstest;

    #[rstest]
    #[case(AuthError::BadCredentials, StatusCode::UNAUTHORIZED)]
    #[case(AuthError::NotAuthenticated, StatusCode::UNAUTHORIZED)]
    #[case(AuthError::Forbidden, StatusCode::FORBIDDEN)]
    #[case(AuthError::InvalidSignature, StatusCode::NOT_ACCEPTABLE)]
    #[case(AuthError::MalformedToken("bad".into()), StatusCode::NOT_ACCEPTABLE)]
    #[case(AuthError::Expired, StatusCode::NOT_ACCEPTABLE)]
    #[case(AuthError::PrincipalGone, StatusCode::NOT_ACCEPTABLE)]
    fn test_auth_error_status(#[case] err: AuthError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
        assert_eq!(AppError::from(err).into_response().status(), expected);
    }

    #[test]
    fn test_token_failures_share_client_message() {
        let messages: Vec<_> = [
            AuthError::InvalidSignature,
            AuthError::MalformedToken("x".into()),
            AuthError::Expired,
            AuthError::PrincipalGone,
        ]
        .iter()
        .map(AuthError::client_message)
        .collect();

        assert!(messages.iter().all(|m| *m == "Invalid token"));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        for err in [
            AppError::Database("no such table: users (libsql)".to_string()),
            AppError::Internal("Failed to sign token".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_token_failure_kinds() {
        assert!(AuthError::Expired.is_token_failure());
        assert!(AuthError::MalformedToken("x".into()).is_token_failure());
        assert!(!AuthError::BadCredentials.is_token_failure());
        assert!(!AuthError::Forbidden.is_token_failure());
    }

    #[test]
    fn test_identity_has_any_role() {
        let identity = Identity::new("alice", vec!["USER".to_string()], 1);

        assert!(identity.has_any_role(&["USER", "ADMIN"]));
        assert!(!identity.has_any_role(&["ADMIN"]));
        assert!(!identity.has_any_role::<&str>(&[]));
    }

    #[test]
    fn test_identity_from_claims() {
        let claims = Claims {
            sub: "bob".to_string(),
            username: "bob".to_string(),
            role: vec!["ADMIN".to_string()],
            user_id: 7,
            exp: 0,
            iat: 0,
        };

        let identity = Identity::from(claims);
        assert_eq!(identity.principal, "bob");
        assert_eq!(identity.roles, vec!["ADMIN".to_string()]);
        assert_eq!(identity.user_id, 7);
    }
}
