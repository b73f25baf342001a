use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::PublicUser;
use crate::handlers::form::MultipartForm;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProfileUpdate;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

/// POST /users/change-avatar - multipart: avatar
pub async fn change_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<PublicUser> {
    let mut form = MultipartForm::read(multipart?).await?;
    let updated = state
        .identity
        .change_avatar(user.id, form.take_file("avatar"))
        .await?;
    Ok(ApiResponse::success("user", updated))
}

/// PATCH /users/edit-user
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<EditUserRequest>, JsonRejection>,
) -> ApiResult<PublicUser> {
    let Json(payload) = payload?;
    let updated = state
        .identity
        .edit_user(
            user.id,
            ProfileUpdate {
                name: payload.name.unwrap_or_default(),
                email: payload.email.unwrap_or_default(),
                current_password: payload.current_password.unwrap_or_default(),
                new_password: payload.new_password.unwrap_or_default(),
                confirm_new_password: payload.confirm_new_password.unwrap_or_default(),
            },
        )
        .await?;
    Ok(ApiResponse::success("user", updated))
}
