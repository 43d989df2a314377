//! OpenAPI document
//!
//! Every handler carries a `#[utoipa::path]` annotation; this module collects
//! them into one document served at `/api-docs/openapi.json`. With the
//! `swagger-ui` feature the same document also backs Swagger UI at
//! `/swagger-ui`.

use crate::types::{LoginRequest, TokenResponse, UserView};
use crate::AppState;
use axum::{extract::State, Json};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Path the OpenAPI JSON document is served on.
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Path the login operation is annotated with; moved by [`api_doc`].
const ANNOTATED_LOGIN_PATH: &str = "/login";

/// Registers the bearer scheme referenced by the guarded routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warden API",
        description = "Token authentication and role-based access control"
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::auth::login,
        crate::api::handlers::users::my_name,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user,
    ),
    components(schemas(LoginRequest, TokenResponse, UserView)),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Credential exchange"),
        (name = "users", description = "Role-guarded user lookups")
    )
)]
pub struct ApiDoc;

/// The OpenAPI document with the login operation listed under `login_path`.
pub fn api_doc(login_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    if login_path != ANNOTATED_LOGIN_PATH {
        if let Some(item) = doc.paths.paths.remove(ANNOTATED_LOGIN_PATH) {
            doc.paths.paths.insert(login_path.to_string(), item);
        }
    }

    doc
}

/// GET /api-docs/openapi.json
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc(&state.config.auth.login_path))
}

/// Swagger UI mounted at `/swagger-ui`, serving `doc` at [`OPENAPI_JSON_PATH`].
#[cfg(feature = "swagger-ui")]
pub fn swagger_ui_router<S>(doc: utoipa::openapi::OpenApi) -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_JSON_PATH, doc)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_has_paths() {
        let spec = ApiDoc::openapi();

        for path in ["/health", "/login", "/user/me", "/user/all", "/user/{id}"] {
            assert!(
                spec.paths.paths.contains_key(path),
                "OpenAPI spec should contain {path}"
            );
        }
    }

    #[test]
    fn test_openapi_contains_schemas_and_security() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("LoginRequest"));
        assert!(json.contains("TokenResponse"));
        assert!(json.contains("UserView"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_login_operation_follows_configured_path() {
        let doc = api_doc("/auth/token");

        assert!(doc.paths.paths.contains_key("/auth/token"));
        assert!(!doc.paths.paths.contains_key("/login"));
        assert!(doc.paths.paths.contains_key("/user/me"));

        assert!(api_doc("/login").paths.paths.contains_key("/login"));
    }

    #[cfg(feature = "swagger-ui")]
    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: axum::Router<()> = swagger_ui_router(api_doc("/login"));
    }
}
