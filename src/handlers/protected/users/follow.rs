use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use crate::api::validate::required;
use crate::database::models::NotificationType;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_id;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::state::AppState;

/// Body of POST and query of DELETE
#[derive(Debug, Default, Deserialize)]
pub struct FollowTarget {
    pub user_id: Option<String>,
}

impl FollowTarget {
    fn resolve(&self) -> Result<Uuid, ApiError> {
        let raw = required(&self.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;
        parse_id(raw, "user")
    }
}

/// POST /api/users/follow
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<FollowTarget>,
) -> ApiResult<()> {
    let target = body.resolve()?;

    if target == user.id {
        return Err(ApiError::bad_request("Cannot follow yourself"));
    }

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(target)
        .fetch_one(&state.pool)
        .await?;

    if !exists {
        return Err(ApiError::not_found("User not found"));
    }

    let inserted: Option<Uuid> = sqlx::query_scalar(
        "INSERT INTO follows (follower_id, following_id) VALUES ($1, $2) \
         ON CONFLICT (follower_id, following_id) DO NOTHING RETURNING id",
    )
    .bind(user.id)
    .bind(target)
    .fetch_optional(&state.pool)
    .await?;

    if inserted.is_none() {
        return Err(ApiError::conflict("Already following this user"));
    }

    NotificationService::new(&state)
        .notify(target, NotificationType::Follow, &user, None)
        .await;

    tracing::info!("{} followed {}", user.id, target);

    Ok(ApiResponse::message_only("User followed successfully"))
}

/// DELETE /api/users/follow?user_id= - succeeds whether or not the follow existed
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<FollowTarget>,
) -> ApiResult<()> {
    let target = query.resolve()?;

    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
        .bind(user.id)
        .bind(target)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::message_only("User unfollowed successfully"))
}
