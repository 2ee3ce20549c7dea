use axum::extract::{Path, State};
use tracing::instrument;

use crate::api::validate::{normalize_optional, validate_content, MAX_POST_LENGTH};
use crate::database::models::PostView;
use crate::error::ApiError;
use crate::handlers::protected::utils::{find_post_owner, load_post, parse_id};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser, MaybeAuthUser};
use crate::state::AppState;

use super::create::PostBody;

/// GET /api/posts/:id - anonymous callers see `is_liked: false`
#[instrument(skip(state, viewer))]
pub async fn get(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> ApiResult<PostView> {
    let post_id = parse_id(&id, "post")?;

    let post = load_post(&state.pool, post_id, viewer.id())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post).message("Post retrieved successfully"))
}

/// PUT /api/posts/:id - owner only
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn put(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<PostBody>,
) -> ApiResult<PostView> {
    let post_id = parse_id(&id, "post")?;
    let content = validate_content(body.content.as_deref(), "Post", MAX_POST_LENGTH).map_err(ApiError::bad_request)?;
    let image_url = normalize_optional(body.image_url);

    let owner = find_post_owner(&state.pool, post_id).await?;
    if owner.user_id != user.id {
        return Err(ApiError::forbidden("Unauthorized to update this post"));
    }

    sqlx::query("UPDATE posts SET content = $2, image_url = $3, updated_at = now() WHERE id = $1")
        .bind(post_id)
        .bind(&content)
        .bind(&image_url)
        .execute(&state.pool)
        .await?;

    let post = load_post(&state.pool, post_id, Some(user.id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post).message("Post updated successfully"))
}

/// DELETE /api/posts/:id - owner only; likes and comments go with it
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let post_id = parse_id(&id, "post")?;

    let owner = find_post_owner(&state.pool, post_id).await?;
    if owner.user_id != user.id {
        return Err(ApiError::forbidden("Unauthorized to delete this post"));
    }

    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(&state.pool)
        .await?;

    tracing::info!("Deleted post {}", post_id);

    Ok(ApiResponse::message_only("Post deleted successfully"))
}
