use axum::extract::{Path, State};
use serde::Serialize;
use tracing::instrument;

use crate::database::models::Notification;
use crate::error::ApiError;
use crate::handlers::protected::utils::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkAllRead {
    pub updated: usize,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

/// PUT /api/notifications/:id - mark one read; repeating it is harmless
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn put(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    let notification_id = parse_id(&id, "notification")?;

    let notification = NotificationService::new(&state)
        .mark_read(notification_id, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Notification not found"))?;

    Ok(ApiResponse::success(notification).message("Notification marked as read"))
}

/// PATCH /api/notifications - mark every unread notification read
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn patch(State(state): State<AppState>, AuthUser(user): AuthUser) -> ApiResult<MarkAllRead> {
    let updated = NotificationService::new(&state).mark_all_read(user.id).await?;

    Ok(ApiResponse::success(MarkAllRead { updated }).message("All notifications marked as read"))
}

/// GET /api/notifications/unread-count
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn unread_count_get(State(state): State<AppState>, AuthUser(user): AuthUser) -> ApiResult<UnreadCount> {
    let unread_count = NotificationService::new(&state).unread_count(user.id).await?;

    Ok(ApiResponse::success(UnreadCount { unread_count }))
}
