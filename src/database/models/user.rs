use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full `users` row. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author/actor reference embedded in posts, comments and notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
}

/// User with on-read follow statistics
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub followers_count: i64,
    pub following_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

#[derive(Debug, FromRow)]
pub struct FollowStatsRow {
    pub followers_count: i64,
    pub following_count: i64,
    pub is_following: bool,
}

/// Column list shared by every query that returns a `User`
pub const USER_COLUMNS: &str =
    "id, email, username, password, bio, avatar_url, created_at, updated_at";

/// Follow counts for `$1`, plus whether `$2` follows `$1` (false when `$2` is NULL)
pub const FOLLOW_STATS_SQL: &str = r#"
    SELECT
        (SELECT COUNT(*) FROM follows WHERE following_id = $1) AS followers_count,
        (SELECT COUNT(*) FROM follows WHERE follower_id = $1) AS following_count,
        EXISTS(SELECT 1 FROM follows WHERE follower_id = $2 AND following_id = $1) AS is_following
"#;
