//! In-process event bus backed by `tokio::sync::broadcast`.
//!
//! Implements [`EventBus`] for cross-component notifications inside a single
//! process. Every subscriber sees every notification on its topics, in publish
//! order; a subscriber that falls behind observes [`EventBusError::Lagged`]
//! items instead of stalling publishers.

use async_stream::stream;
use recipe_client_core::event_bus::{
    EventBus, EventBusError, Notification, NotificationStream,
};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::broadcast;

/// Event bus carried on a single broadcast channel.
///
/// Topic filtering happens on the subscriber side; with the handful of topics
/// this client uses, one channel is simpler than a channel per topic.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(BroadcastEventBus::new(64));
/// let mut stream = bus.subscribe(&["recipe-events"]).await?;
/// bus.publish("recipe-events", &note).await?;
/// ```
#[derive(Clone, Debug)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastEventBus {
    /// Create a bus with the given per-subscriber buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus for BroadcastEventBus {
    fn publish(
        &self,
        topic: &str,
        notification: &Notification,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
        // The topic argument wins over whatever the notification was built
        // with, so a notification can be re-published on another topic.
        let mut notification = notification.clone();
        notification.topic = topic.to_owned();

        let delivered = self.sender.send(notification);

        Box::pin(async move {
            match delivered {
                Ok(subscribers) => {
                    tracing::trace!(subscribers, "Notification published");
                    Ok(())
                },
                // No live subscribers is not a failure for a fire-and-forget bus.
                Err(broadcast::error::SendError(_)) => {
                    tracing::trace!("Notification published with no subscribers");
                    Ok(())
                },
            }
        })
    }

    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<NotificationStream, EventBusError>> + Send + '_>>
    {
        let topics: Vec<String> = topics.iter().map(|t| (*t).to_owned()).collect();
        let mut rx = self.sender.subscribe();

        Box::pin(async move {
            let filtered = stream! {
                loop {
                    match rx.recv().await {
                        Ok(note) if topics.iter().any(|t| *t == note.topic) => {
                            yield Ok(note);
                        },
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            yield Err(EventBusError::Lagged(skipped));
                        },
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            };

            Ok(Box::pin(filtered) as NotificationStream)
        })
    }
}
