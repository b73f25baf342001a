use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginSession, Registration};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /users/register
///
/// ```json
/// { "name": "...", "email": "...", "password": "...", "confirmPassword": "..." }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let email = state
        .identity
        .register(Registration {
            name: payload.name.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            password: payload.password.unwrap_or_default(),
            confirm_password: payload.confirm_password.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::flat(json!({ "message": format!("New user {} registered", email) }))
        .with_status(StatusCode::CREATED))
}

/// POST /users/login - returns `{ token, id, name }`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginSession> {
    let Json(payload) = payload?;
    let session = state
        .identity
        .login(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(ApiResponse::flat(session))
}

/// GET /users/:id - public profile
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PublicUser> {
    let id = parse_id(&id, "User not found.")?;
    let user = state.identity.get_user(id).await?;
    Ok(ApiResponse::success("user", user))
}

/// GET on the static `/users/register` and `/users/login` paths, which no
/// user id can match
pub async fn unknown_user() -> ApiError {
    ApiError::not_found("User not found.")
}

/// GET /users - all authors
pub async fn list_authors(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    let users = state.identity.list_authors().await?;
    Ok(ApiResponse::success("users", users))
}
