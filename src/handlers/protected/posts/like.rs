use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use crate::database::models::NotificationType;
use crate::error::ApiError;
use crate::handlers::protected::utils::{find_post_owner, parse_id};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::state::AppState;

/// POST /api/posts/:id/like
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let post_id = parse_id(&id, "post")?;
    let owner = find_post_owner(&state.pool, post_id).await?;

    // The unique (user_id, post_id) constraint arbitrates concurrent likes
    let inserted: Option<Uuid> = sqlx::query_scalar(
        "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, post_id) DO NOTHING RETURNING id",
    )
    .bind(user.id)
    .bind(post_id)
    .fetch_optional(&state.pool)
    .await?;

    if inserted.is_none() {
        return Err(ApiError::conflict("Post already liked"));
    }

    NotificationService::new(&state)
        .notify(owner.user_id, NotificationType::Like, &user, Some(post_id))
        .await;

    Ok(ApiResponse::message_only("Post liked successfully"))
}

/// DELETE /api/posts/:id/like - succeeds whether or not a like existed
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let post_id = parse_id(&id, "post")?;

    let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
        .bind(user.id)
        .bind(post_id)
        .execute(&state.pool)
        .await?
        .rows_affected();

    tracing::debug!("Unlike of {} removed {} row(s)", post_id, removed);

    Ok(ApiResponse::message_only("Post unliked successfully"))
}
