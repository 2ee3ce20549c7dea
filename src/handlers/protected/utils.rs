use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::post::POST_SELECT;
use crate::database::models::{PostOwner, PostRow, PostView};
use crate::error::ApiError;

/// Parse a path/body id, naming the thing in the 400 message ("Invalid post ID")
pub fn parse_id(raw: &str, thing: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid {} ID", thing)))
}

/// Owner lookup used before like/comment/update/delete. 404 when the post is gone.
pub async fn find_post_owner(pool: &PgPool, post_id: Uuid) -> Result<PostOwner, ApiError> {
    sqlx::query_as::<_, PostOwner>("SELECT id, user_id FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))
}

/// Single post with author, counts and `is_liked` for `viewer`
pub async fn load_post(pool: &PgPool, post_id: Uuid, viewer: Option<Uuid>) -> Result<Option<PostView>, sqlx::Error> {
    let query = format!("{} WHERE p.id = $2", POST_SELECT);

    let row = sqlx::query_as::<_, PostRow>(&query)
        .bind(viewer)
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(PostView::from))
}
