use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::{Page, PageQuery};
use crate::database::models::NotificationView;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    /// Only `unread=true` filters; anything else lists everything
    pub unread: Option<String>,
}

impl NotificationQuery {
    fn unread_only(&self) -> bool {
        self.unread.as_deref().map(str::trim) == Some("true")
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationList {
    pub notifications: Vec<NotificationView>,
    pub unread_count: i64,
    /// Length of this page, not of the whole inbox
    pub total_count: usize,
}

/// GET /api/notifications?page&limit&unread=true
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<NotificationQuery>,
) -> ApiResult<NotificationList> {
    let page = Page::from_query(&query.page);
    let service = NotificationService::new(&state);

    let notifications = service.list(user.id, query.unread_only(), page).await?;
    let unread_count = service.unread_count(user.id).await?;

    let list = NotificationList {
        total_count: notifications.len(),
        notifications,
        unread_count,
    };

    Ok(ApiResponse::success(list).message("Notifications retrieved successfully"))
}
