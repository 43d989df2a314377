use crate::{
    auth::CurrentIdentity,
    types::{AppError, Result, UserView},
    AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// Name of the calling principal
#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "Principal name", body = String),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing role"),
        (status = 406, description = "Invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn my_name(CurrentIdentity(identity): CurrentIdentity) -> String {
    identity.principal
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/user/all",
    responses(
        (status = 200, description = "All users", body = Vec<UserView>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing role"),
        (status = 406, description = "Invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.iter().map(|u| u.view()).collect()))
}

/// Get a user by id (admin only)
#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserView),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing role"),
        (status = 404, description = "No such user"),
        (status = 406, description = "Invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserView>> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user.view()))
}
