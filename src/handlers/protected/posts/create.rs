use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use crate::api::validate::{normalize_optional, validate_content, MAX_POST_LENGTH};
use crate::database::models::PostView;
use crate::error::ApiError;
use crate::handlers::protected::utils::load_post;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// POST /api/posts/create
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<PostBody>,
) -> ApiResult<PostView> {
    let content = validate_content(body.content.as_deref(), "Post", MAX_POST_LENGTH).map_err(ApiError::bad_request)?;
    let image_url = normalize_optional(body.image_url);

    let post_id: uuid::Uuid =
        sqlx::query_scalar("INSERT INTO posts (user_id, content, image_url) VALUES ($1, $2, $3) RETURNING id")
            .bind(user.id)
            .bind(&content)
            .bind(&image_url)
            .fetch_one(&state.pool)
            .await?;

    let post = load_post(&state.pool, post_id, Some(user.id))
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to create post"))?;

    tracing::info!("Created post {}", post.id);

    Ok(ApiResponse::created(post).message("Post created successfully"))
}
