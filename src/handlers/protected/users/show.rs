use axum::extract::{Path, State};
use tracing::instrument;

use crate::database::models::user::{User, USER_COLUMNS};
use crate::database::models::UserProfile;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_id;
use crate::middleware::{ApiResponse, ApiResult, MaybeAuthUser};
use crate::state::AppState;

use super::follow_stats;

/// GET /api/users/:id - public profile; `is_following` is false for anonymous callers
#[instrument(skip(state, viewer))]
pub async fn get(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> ApiResult<UserProfile> {
    let user_id = parse_id(&id, "user")?;

    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let stats = follow_stats(&state.pool, user_id, viewer.id()).await?;

    let profile = UserProfile {
        user,
        followers_count: stats.followers_count,
        following_count: stats.following_count,
        is_following: Some(stats.is_following),
    };

    Ok(ApiResponse::success(profile).message("User profile retrieved successfully"))
}
