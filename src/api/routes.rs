use crate::api::handlers::{self, auth, users};
use crate::auth::guard::roles::{ADMIN, USER};
use crate::auth::middleware::{login_middleware, token_middleware};
use crate::{require_roles, AppState};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Builds the full application router.
///
/// Both interceptors wrap every route: the login interceptor answers
/// credential exchanges on the login path, the token interceptor binds an
/// identity everywhere else. Role checks are per route.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route(&state.config.auth.login_path, post(auth::login));

    #[cfg(not(feature = "swagger-ui"))]
    let public_routes = public_routes.route(
        crate::api::openapi::OPENAPI_JSON_PATH,
        get(crate::api::openapi::openapi_json),
    );

    #[cfg(feature = "swagger-ui")]
    let public_routes = public_routes.merge(crate::api::openapi::swagger_ui_router(
        crate::api::openapi::api_doc(&state.config.auth.login_path),
    ));

    let user_routes = Router::new()
        .route(
            "/user/me",
            get(users::my_name).route_layer(require_roles!(USER, ADMIN)),
        )
        .route(
            "/user/all",
            get(users::list_users).route_layer(require_roles!(ADMIN)),
        )
        .route(
            "/user/{id}",
            get(users::get_user).route_layer(require_roles!(ADMIN)),
        );

    public_routes
        .merge(user_routes)
        .layer(from_fn_with_state(state.clone(), token_middleware))
        .layer(from_fn_with_state(state.clone(), login_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
