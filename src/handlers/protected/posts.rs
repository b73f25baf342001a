use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Extension,
};
use serde_json::{json, Value};

use crate::database::models::Post;
use crate::handlers::form::MultipartForm;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PostFields;
use crate::state::AppState;

fn post_fields(form: &MultipartForm) -> PostFields {
    PostFields {
        title: form.text("title"),
        category: form.text("category"),
        description: form.text("description"),
    }
}

/// POST /posts - multipart: title, category, description, thumbnail
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Post> {
    let mut form = MultipartForm::read(multipart?).await?;
    let fields = post_fields(&form);
    let thumbnail = form.take_file("thumbnail");

    let post = state.content.create_post(user.id, fields, thumbnail).await?;
    Ok(ApiResponse::success("post", post).with_status(StatusCode::CREATED))
}

/// PATCH /posts/:id - owner only; thumbnail optional
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Post> {
    let post_id = parse_id(&id, "Post not found.")?;
    let mut form = MultipartForm::read(multipart?).await?;
    let fields = post_fields(&form);
    let thumbnail = form.take_file("thumbnail");

    let post = state.content.edit_post(post_id, user.id, fields, thumbnail).await?;
    Ok(ApiResponse::success("post", post))
}

/// DELETE /posts/:id - owner only
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let post_id = parse_id(&id, "Post does not exist.")?;
    state.content.delete_post(post_id, user.id).await?;
    Ok(ApiResponse::flat(json!({
        "message": format!("Post {} deleted successfully.", post_id)
    })))
}
