use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;

#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_username: String,
    pub author_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl From<CommentRow> for CommentView {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            post_id: row.post_id,
            content: row.content,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                username: row.author_username,
                avatar_url: row.author_avatar_url,
            },
        }
    }
}

/// Insert a comment and return it joined with its author in one round trip
pub const COMMENT_INSERT: &str = r#"
    WITH inserted AS (
        INSERT INTO comments (user_id, post_id, content)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, post_id, content, created_at
    )
    SELECT
        i.id, i.user_id, i.post_id, i.content, i.created_at,
        u.username AS author_username,
        u.avatar_url AS author_avatar_url
    FROM inserted i
    JOIN users u ON u.id = i.user_id
"#;

pub const COMMENT_PAGE: &str = r#"
    SELECT
        c.id, c.user_id, c.post_id, c.content, c.created_at,
        u.username AS author_username,
        u.avatar_url AS author_avatar_url
    FROM comments c
    JOIN users u ON u.id = c.user_id
    WHERE c.post_id = $1
    ORDER BY c.created_at DESC
    LIMIT $2 OFFSET $3
"#;
