use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;

/// Flat result of [`POST_SELECT`]: post columns, author columns and on-read counts
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

/// Post as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    pub likes_count: i64,
    pub comments_count: i64,
    pub is_liked: bool,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            content: row.content,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: UserSummary {
                id: row.user_id,
                username: row.author_username,
                avatar_url: row.author_avatar_url,
            },
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            is_liked: row.is_liked,
        }
    }
}

/// Minimal post reference embedded in notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub content: String,
}

/// Ownership lookup used before update/delete/like
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PostOwner {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// `$1` is the viewer id (NULL for anonymous callers); callers append WHERE/ORDER clauses.
pub const POST_SELECT: &str = r#"
    SELECT
        p.id, p.user_id, p.content, p.image_url, p.created_at, p.updated_at,
        u.username AS author_username,
        u.avatar_url AS author_avatar_url,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
        EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) AS is_liked
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;
