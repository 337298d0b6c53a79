//! 用户处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::instrument;

use super::{
    extract::UserId,
    model::{ListQuery, User, UserStatus},
};
use crate::{
    app::{system::handler::route_not_found, AppState},
    core::{
        error::CoreError,
        extract::{AppJson, AppPath, AppQuery},
        response::{ApiResponse, ListResponse},
    },
};

/// 具体路径先于 `/users/:id` 注册
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users).post(create_user).fallback(route_not_found),
        )
        .route(
            "/users/city/:city_name",
            get(get_users_by_city).fallback(route_not_found),
        )
        .route(
            "/users/status/:status",
            get(get_users_by_status).fallback(route_not_found),
        )
        .route(
            "/users/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user)
                .fallback(route_not_found),
        )
}

/// 获取所有用户，支持 `?active=true|false`
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Json<ListResponse<User>> {
    let users = state.users.list(query.active_filter());
    Json(ListResponse::new(users))
}

#[instrument(skip(state))]
pub async fn get_users_by_city(
    State(state): State<AppState>,
    AppPath(city_name): AppPath<String>,
) -> Json<ListResponse<User>> {
    let users = state.users.by_city(&city_name);
    Json(ListResponse::new(users).with_city(city_name))
}

#[instrument(skip(state))]
pub async fn get_users_by_status(
    State(state): State<AppState>,
    AppPath(status): AppPath<String>,
) -> Result<Json<ListResponse<User>>, CoreError> {
    let status = UserStatus::parse(&status).ok_or_else(|| {
        CoreError::validation("status", "status must be either 'active' or 'inactive'")
    })?;
    let users = state.users.by_status(status);
    Ok(Json(ListResponse::new(users).with_status(status.as_str())))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<User>, CoreError> {
    Ok(Json(state.users.get(id)?))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<Value>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), CoreError> {
    let user = state.users.create(&body)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User created successfully", user)),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    AppJson(body): AppJson<Value>,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let user = state.users.update(id, &body)?;
    Ok(Json(ApiResponse::new("User updated successfully", user)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<ApiResponse<User>>, CoreError> {
    let user = state.users.delete(id)?;
    Ok(Json(ApiResponse::new("User deleted successfully", user)))
}
