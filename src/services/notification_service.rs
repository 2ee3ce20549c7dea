use sqlx::PgPool;
use uuid::Uuid;

use crate::api::Page;
use crate::database::models::notification::{NOTIFICATION_COLUMNS, NOTIFICATION_PAGE};
use crate::database::models::{Notification, NotificationRow, NotificationType, NotificationView, User};
use crate::realtime::{NotificationEvent, NotificationHub};
use crate::state::AppState;

/// Writes to the `notifications` table and mirrors each change onto the hub
pub struct NotificationService {
    pool: PgPool,
    hub: NotificationHub,
}

impl NotificationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            hub: state.hub.clone(),
        }
    }

    /// Record that `actor` did `kind` to `recipient`. Self-actions are skipped.
    ///
    /// This is a side effect of another write, so failures are logged and
    /// swallowed rather than failing the caller's request.
    pub async fn notify(
        &self,
        recipient: Uuid,
        kind: NotificationType,
        actor: &User,
        related_post_id: Option<Uuid>,
    ) -> Option<Notification> {
        if recipient == actor.id {
            return None;
        }

        let query = format!(
            "INSERT INTO notifications (user_id, type, content, related_user_id, related_post_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Notification>(&query)
            .bind(recipient)
            .bind(kind.as_str())
            .bind(kind.message(&actor.username))
            .bind(actor.id)
            .bind(related_post_id)
            .fetch_one(&self.pool)
            .await;

        match inserted {
            Ok(notification) => {
                let delivered = self.hub.publish(NotificationEvent::insert(notification.clone())).await;
                tracing::debug!(
                    "Created {} notification {} for {} (live subscribers: {})",
                    kind.as_str(),
                    notification.id,
                    recipient,
                    delivered
                );
                Some(notification)
            }
            Err(e) => {
                tracing::warn!("Failed to create {} notification for {}: {}", kind.as_str(), recipient, e);
                None
            }
        }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: Page,
    ) -> Result<Vec<NotificationView>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NotificationRow>(NOTIFICATION_PAGE)
            .bind(user_id)
            .bind(unread_only)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(NotificationView::from).collect())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    /// `None` when the notification does not exist or belongs to someone else.
    /// Marking an already-read notification succeeds again.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        let updated = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(notification) = &updated {
            self.hub.publish(NotificationEvent::update(notification.clone())).await;
        }

        Ok(updated)
    }

    /// Returns the number of notifications that flipped from unread to read
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<usize, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true WHERE user_id = $1 AND is_read = false RETURNING {}",
            NOTIFICATION_COLUMNS
        );

        let updated = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let count = updated.len();
        for notification in updated {
            self.hub.publish(NotificationEvent::update(notification)).await;
        }

        Ok(count)
    }
}
