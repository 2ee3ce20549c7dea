// handlers/protected/notifications/realtime.rs - Server-sent event stream
//
// Each connection holds one hub subscription for the caller. Dropping the
// stream (client disconnect) drops the subscription, which releases the
// user's channel once no other connection is listening.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::middleware::AuthUser;
use crate::realtime::Subscription;
use crate::state::AppState;

/// GET /api/notifications/realtime
///
/// Emits a `connected` event, then one `notification` event per INSERT/UPDATE:
///
/// ```text
/// event: notification
/// data: {"event":"INSERT","new":{"id":"…","type":"like",…}}
/// ```
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let user_id = user.id;
    let subscription = state.hub.subscription(user_id).await;

    tracing::info!(
        "Realtime subscriber connected for {} ({} open)",
        user_id,
        state.hub.subscriber_count(user_id).await
    );

    let connected = stream::once(async move {
        Event::default()
            .event("connected")
            .json_data(json!({ "user_id": user_id }))
    });

    Sse::new(connected.chain(notification_events(subscription))).keep_alive(KeepAlive::default())
}

fn notification_events(subscription: Subscription) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(subscription, |mut subscription| async move {
        let user_id = subscription.user_id();
        loop {
            match subscription.recv().await {
                Ok(event) => {
                    let sse = Event::default().event("notification").json_data(&event);
                    return Some((sse, subscription));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Realtime subscriber {} lagged, skipped {} event(s)", user_id, skipped);
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Realtime channel for {} closed", user_id);
                    return None;
                }
            }
        }
    })
}
