use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::api::validate::{validate_content, MAX_COMMENT_LENGTH};
use crate::api::{Page, PageQuery};
use crate::database::models::comment::{COMMENT_INSERT, COMMENT_PAGE};
use crate::database::models::{CommentRow, CommentView, NotificationType};
use crate::error::ApiError;
use crate::handlers::protected::utils::{find_post_owner, parse_id};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::NotificationService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: Option<String>,
}

/// POST /api/posts/:id/comment
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn post(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CommentBody>,
) -> ApiResult<CommentView> {
    let post_id = parse_id(&id, "post")?;
    let content =
        validate_content(body.content.as_deref(), "Comment", MAX_COMMENT_LENGTH).map_err(ApiError::bad_request)?;

    let owner = find_post_owner(&state.pool, post_id).await?;

    let comment = sqlx::query_as::<_, CommentRow>(COMMENT_INSERT)
        .bind(user.id)
        .bind(post_id)
        .bind(&content)
        .fetch_one(&state.pool)
        .await?;

    NotificationService::new(&state)
        .notify(owner.user_id, NotificationType::Comment, &user, Some(post_id))
        .await;

    Ok(ApiResponse::created(CommentView::from(comment)).message("Comment created successfully"))
}

/// GET /api/posts/:id/comments - readable without a token
#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<CommentView>> {
    let post_id = parse_id(&id, "post")?;
    find_post_owner(&state.pool, post_id).await?;

    let page = Page::from_query(&query);

    let rows = sqlx::query_as::<_, CommentRow>(COMMENT_PAGE)
        .bind(post_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&state.pool)
        .await?;

    let comments: Vec<CommentView> = rows.into_iter().map(CommentView::from).collect();

    Ok(ApiResponse::success(comments).message("Comments retrieved successfully"))
}
