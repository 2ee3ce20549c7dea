pub mod follow;
pub mod profile;
pub mod show;

pub use profile::get as profile_get;
pub use profile::put as profile_put;
pub use show::get as user_get;
pub use follow::post as follow_post;
pub use follow::delete as follow_delete;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::user::{FollowStatsRow, FOLLOW_STATS_SQL};

/// Follower/following counts for `user_id`, plus whether `viewer` follows them
pub(crate) async fn follow_stats(
    pool: &PgPool,
    user_id: Uuid,
    viewer: Option<Uuid>,
) -> Result<FollowStatsRow, sqlx::Error> {
    sqlx::query_as::<_, FollowStatsRow>(FOLLOW_STATS_SQL)
        .bind(user_id)
        .bind(viewer)
        .fetch_one(pool)
        .await
}
