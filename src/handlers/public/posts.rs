use axum::extract::{Path, State};
use uuid::Uuid;

use crate::database::models::Post;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /posts - all posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.content.list_posts().await?;
    Ok(ApiResponse::success("posts", posts))
}

/// GET /posts/:id
pub async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id, "Post not found.")?;
    let post = state.content.get_post(id).await?;
    Ok(ApiResponse::success("post", post))
}

/// GET /posts/categories/:category
pub async fn category_posts(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<Post>> {
    let posts = state.content.list_posts_by_category(&category).await?;
    Ok(ApiResponse::success("posts", posts))
}

/// GET /posts/users/:id - posts by one author
pub async fn user_posts(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Post>> {
    let creator = Uuid::parse_str(&id).map_err(|_| ApiError::validation("Invalid user id."))?;
    let posts = state.content.list_posts_by_creator(creator).await?;
    Ok(ApiResponse::success("posts", posts))
}
