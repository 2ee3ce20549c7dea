use axum::extract::{Query, State};
use tracing::instrument;

use crate::api::{Page, PageQuery};
use crate::database::models::post::POST_SELECT;
use crate::database::models::{PostRow, PostView};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/posts/feed - the caller's posts plus posts from everyone they follow
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<PostView>> {
    let page = Page::from_query(&query);

    let sql = format!(
        "{} WHERE p.user_id = $1 \
           OR p.user_id IN (SELECT following_id FROM follows WHERE follower_id = $1) \
         ORDER BY p.created_at DESC \
         LIMIT $2 OFFSET $3",
        POST_SELECT
    );

    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(user.id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&state.pool)
        .await?;

    let posts: Vec<PostView> = rows.into_iter().map(PostView::from).collect();

    Ok(ApiResponse::success(posts).message("Feed retrieved successfully"))
}
