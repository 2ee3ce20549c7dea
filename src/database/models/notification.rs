use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::post::PostSummary;
use super::user::UserSummary;

/// What triggered a notification. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Follow,
    Like,
    Comment,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Follow => "follow",
            NotificationType::Like => "like",
            NotificationType::Comment => "comment",
        }
    }

    /// Human-readable line shown to the recipient
    pub fn message(&self, actor_username: &str) -> String {
        match self {
            NotificationType::Follow => format!("{} started following you", actor_username),
            NotificationType::Like => format!("{} liked your post", actor_username),
            NotificationType::Comment => format!("{} commented on your post", actor_username),
        }
    }
}

/// `notifications` row, also the payload pushed to realtime subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub is_read: bool,
    pub related_user_id: Option<Uuid>,
    pub related_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

pub const NOTIFICATION_COLUMNS: &str =
    "id, user_id, type, content, is_read, related_user_id, related_post_id, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub content: String,
    pub is_read: bool,
    pub related_user_id: Option<Uuid>,
    pub related_post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub related_username: Option<String>,
    pub related_avatar_url: Option<String>,
    pub related_post_content: Option<String>,
}

/// Notification joined with its actor and post, as listed by the API
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub related_user: Option<UserSummary>,
    pub related_post: Option<PostSummary>,
}

impl From<NotificationRow> for NotificationView {
    fn from(row: NotificationRow) -> Self {
        let related_user = match (row.related_user_id, row.related_username) {
            (Some(id), Some(username)) => Some(UserSummary {
                id,
                username,
                avatar_url: row.related_avatar_url,
            }),
            _ => None,
        };
        let related_post = match (row.related_post_id, row.related_post_content) {
            (Some(id), Some(content)) => Some(PostSummary { id, content }),
            _ => None,
        };

        Self {
            notification: Notification {
                id: row.id,
                user_id: row.user_id,
                kind: row.kind,
                content: row.content,
                is_read: row.is_read,
                related_user_id: row.related_user_id,
                related_post_id: row.related_post_id,
                created_at: row.created_at,
            },
            related_user,
            related_post,
        }
    }
}

/// `$1` recipient, `$2` unread-only flag, `$3` limit, `$4` offset
pub const NOTIFICATION_PAGE: &str = r#"
    SELECT
        n.id, n.user_id, n.type, n.content, n.is_read,
        n.related_user_id, n.related_post_id, n.created_at,
        ru.username AS related_username,
        ru.avatar_url AS related_avatar_url,
        rp.content AS related_post_content
    FROM notifications n
    LEFT JOIN users ru ON ru.id = n.related_user_id
    LEFT JOIN posts rp ON rp.id = n.related_post_id
    WHERE n.user_id = $1
      AND ($2 = false OR n.is_read = false)
    ORDER BY n.created_at DESC
    LIMIT $3 OFFSET $4
"#;
