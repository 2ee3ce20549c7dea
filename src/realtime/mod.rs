//! In-process change feed for the `notifications` table.
//!
//! Each user id maps to one broadcast channel. Handlers publish after the row
//! is written; SSE connections hold receivers. Channels whose receivers have
//! all gone are dropped on the next publish to that user.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::database::models::Notification;

/// Events buffered per user before a slow subscriber starts lagging
pub(crate) const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
}

/// Row-level change pushed to subscribers, shaped like a change-feed payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub event: ChangeKind,
    pub new: Notification,
}

impl NotificationEvent {
    pub fn insert(notification: Notification) -> Self {
        Self { event: ChangeKind::Insert, new: notification }
    }

    pub fn update(notification: Notification) -> Self {
        Self { event: ChangeKind::Update, new: notification }
    }

    pub fn recipient(&self) -> Uuid {
        self.new.user_id
    }
}

#[derive(Clone, Default)]
pub struct NotificationHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<NotificationEvent>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new receiver for `user_id`, creating the channel on first use
    pub async fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<NotificationEvent> {
        // Fast path: try read lock
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(&user_id) {
                return sender.subscribe();
            }
        }

        let mut channels = self.channels.write().await;
        // Sweep channels left behind by subscribers that went away without a later publish
        channels.retain(|_, sender| sender.receiver_count() > 0);
        channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Like [`subscribe`](Self::subscribe), but the channel is released as soon
    /// as the returned handle is dropped and no other receiver remains.
    pub async fn subscription(&self, user_id: Uuid) -> Subscription {
        Subscription {
            receiver: Some(self.subscribe(user_id).await),
            hub: self.clone(),
            user_id,
        }
    }

    /// Remove the channel for `user_id` if nobody is listening anymore
    pub async fn release(&self, user_id: Uuid) {
        let mut channels = self.channels.write().await;
        prune_idle(&mut channels, user_id);
    }

    /// Drop the channel for `user_id`; open receivers see the stream close
    pub async fn unsubscribe(&self, user_id: Uuid) {
        if self.channels.write().await.remove(&user_id).is_some() {
            tracing::debug!("Removed notification channel for {}", user_id);
        }
    }

    pub async fn unsubscribe_all(&self) {
        let mut channels = self.channels.write().await;
        let count = channels.len();
        channels.clear();
        tracing::debug!("Removed {} notification channels", count);
    }

    /// Deliver to the recipient's live subscribers. Returns how many received it.
    pub async fn publish(&self, event: NotificationEvent) -> usize {
        let user_id = event.recipient();

        let delivered = {
            let channels = self.channels.read().await;
            match channels.get(&user_id) {
                Some(sender) => sender.send(event).ok(),
                None => return 0,
            }
        };

        match delivered {
            Some(count) => count,
            None => {
                // Every receiver is gone; prune unless someone re-subscribed meanwhile
                self.release(user_id).await;
                0
            }
        }
    }

    pub async fn subscriber_count(&self, user_id: Uuid) -> usize {
        self.channels
            .read()
            .await
            .get(&user_id)
            .map_or(0, |sender| sender.receiver_count())
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

fn prune_idle(channels: &mut HashMap<Uuid, broadcast::Sender<NotificationEvent>>, user_id: Uuid) {
    if channels.get(&user_id).is_some_and(|s| s.receiver_count() == 0) {
        channels.remove(&user_id);
        tracing::debug!("Released idle notification channel for {}", user_id);
    }
}

/// Receiver handle tied to the hub. Dropping it releases the user's channel
/// once it was the last receiver.
pub struct Subscription {
    hub: NotificationHub,
    user_id: Uuid,
    receiver: Option<broadcast::Receiver<NotificationEvent>>,
}

impl Subscription {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub async fn recv(&mut self) -> Result<NotificationEvent, broadcast::error::RecvError> {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => Err(broadcast::error::RecvError::Closed),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The receiver must be gone before the count is checked
        drop(self.receiver.take());

        if let Ok(mut channels) = self.hub.channels.try_write() {
            prune_idle(&mut channels, self.user_id);
        } else if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let hub = self.hub.clone();
            let user_id = self.user_id;
            runtime.spawn(async move { hub.release(user_id).await });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification_for(user_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id,
            kind: "follow".to_string(),
            content: "ada started following you".to_string(),
            is_read: false,
            related_user_id: Some(Uuid::new_v4()),
            related_post_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn routes_events_to_recipient_only() {
        let hub = NotificationHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let mut alice_rx = hub.subscribe(alice).await;
        let mut bob_rx = hub.subscribe(bob).await;

        let event = NotificationEvent::insert(notification_for(alice));
        assert_eq!(hub.publish(event.clone()).await, 1);

        assert_eq!(alice_rx.recv().await.unwrap(), event);
        assert!(matches!(bob_rx.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn fans_out_to_every_connection_of_a_user() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let mut first = hub.subscribe(user).await;
        let mut second = hub.subscribe(user).await;

        assert_eq!(hub.subscriber_count(user).await, 2);
        assert_eq!(hub.publish(NotificationEvent::update(notification_for(user))).await, 2);
        assert_eq!(first.recv().await.unwrap().event, ChangeKind::Update);
        assert_eq!(second.recv().await.unwrap().event, ChangeKind::Update);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        assert_eq!(hub.publish(NotificationEvent::insert(notification_for(user))).await, 0);
        assert_eq!(hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn prunes_channel_after_receivers_drop() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        drop(hub.subscribe(user).await);

        assert_eq!(hub.channel_count().await, 1);
        assert_eq!(hub.publish(NotificationEvent::insert(notification_for(user))).await, 0);
        assert_eq!(hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn unsubscribe_closes_open_receivers() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let mut rx = hub.subscribe(user).await;

        hub.unsubscribe(user).await;
        assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Closed)));

        let _a = hub.subscribe(Uuid::new_v4()).await;
        let _b = hub.subscribe(Uuid::new_v4()).await;
        hub.unsubscribe_all().await;
        assert_eq!(hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn dropping_subscription_releases_channel() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();

        let first = hub.subscription(user).await;
        let second = hub.subscription(user).await;
        assert_eq!(hub.subscriber_count(user).await, 2);

        drop(first);
        assert_eq!(hub.channel_count().await, 1);

        drop(second);
        assert_eq!(hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn subscribe_sweeps_abandoned_channels() {
        let hub = NotificationHub::new();
        drop(hub.subscribe(Uuid::new_v4()).await);
        drop(hub.subscribe(Uuid::new_v4()).await);
        assert_eq!(hub.channel_count().await, 2);

        let _live = hub.subscribe(Uuid::new_v4()).await;
        assert_eq!(hub.channel_count().await, 1);
    }

    #[tokio::test]
    async fn subscription_recv_reports_lag_then_continues() {
        let hub = NotificationHub::new();
        let user = Uuid::new_v4();
        let mut subscription = hub.subscription(user).await;

        for _ in 0..CHANNEL_CAPACITY + 5 {
            hub.publish(NotificationEvent::insert(notification_for(user))).await;
        }

        assert!(matches!(
            subscription.recv().await,
            Err(broadcast::error::RecvError::Lagged(5))
        ));
        assert!(subscription.recv().await.is_ok());
    }

    #[test]
    fn event_serializes_like_a_change_feed_payload() {
        let user = Uuid::new_v4();
        let value = serde_json::to_value(NotificationEvent::insert(notification_for(user))).unwrap();
        assert_eq!(value["event"], "INSERT");
        assert_eq!(value["new"]["user_id"], user.to_string());
        assert_eq!(value["new"]["type"], "follow");
    }
}
