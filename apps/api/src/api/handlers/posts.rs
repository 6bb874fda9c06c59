use axum::{extract::State, Json};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::extract::Payload;
use crate::api::middleware::auth::AuthUser;
use crate::domain::post::Post;
use crate::domain::validation::Validator;
use crate::state::AppState;

/// Request body for a new post
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub text: Option<String>,
}

/// Create a post as the caller
///
/// POST /api/post
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Payload(req): Payload<CreatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    Validator::new()
        .required("text", req.text.as_deref(), "Text is required")
        .finish()?;

    let author = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let post = Post::new(&author, req.text.unwrap_or_default());
    state.posts.create(&post).await?;
    tracing::info!(%user_id, post_id = %post.id, "post created");

    Ok(Json(post))
}
