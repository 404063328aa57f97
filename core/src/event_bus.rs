//! Event bus abstraction for cross-component notifications.
//!
//! This module provides the [`EventBus`] trait for publishing and subscribing
//! to notifications across component boundaries: store sync events that views
//! outside the store's own subscription need to hear about, session
//! transitions, and similar cross-cutting signals. The bus is independent of
//! the store: it carries notifications, not state.
//!
//! # Key Principles
//!
//! - **Explicit construction**: the bus is built once at startup and injected
//!   into whatever needs it. There is no process-global instance.
//! - **Fire-and-forget**: publishing never blocks on subscribers.
//! - **Lossy under lag**: a slow subscriber observes a lag error item rather
//!   than stalling publishers.
//!
//! # Topic Naming Convention
//!
//! Topics follow the pattern `{component}-events`:
//! - `recipe-events` - cache synchronization notifications
//! - `session-events` - authentication/session transitions
//!
//! # Example
//!
//! ```rust,ignore
//! use recipe_client_core::event_bus::{EventBus, Notification};
//! use futures::StreamExt;
//!
//! async fn example(bus: &dyn EventBus) {
//!     let note = Notification::new("recipe-events", serde_json::json!({ "kind": "fetched" }));
//!     bus.publish("recipe-events", &note).await?;
//!
//!     let mut stream = bus.subscribe(&["recipe-events"]).await?;
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(note) => println!("received on {}", note.topic),
//!             Err(e) => eprintln!("bus error: {e}"),
//!         }
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// A notification carried on the bus.
///
/// Payloads are plain JSON values: the bus is in-process only, so there is no
/// wire framing to worry about, and JSON keeps subscribers decoupled from the
/// publisher's concrete types.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Topic the notification was published on
    pub topic: String,

    /// Structured payload
    pub payload: serde_json::Value,

    /// When the notification was created
    pub published_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification for a topic with a JSON payload.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
            published_at: Utc::now(),
        }
    }
}

/// Errors that can occur during event bus operations.
#[derive(Error, Debug, Clone)]
pub enum EventBusError {
    /// Failed to publish a notification to a topic
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },

    /// Failed to subscribe to topics
    #[error("Subscription failed for topics {topics:?}: {reason}")]
    SubscriptionFailed {
        /// The topics that failed to subscribe
        topics: Vec<String>,
        /// The reason for failure
        reason: String,
    },

    /// Subscriber fell behind and missed notifications
    #[error("Subscriber lagged, {0} notifications skipped")]
    Lagged(u64),

    /// The bus has shut down
    #[error("Event bus closed")]
    Closed,
}

/// Stream of notifications from subscriptions.
///
/// Each item is a `Result` so subscribers observe lag without the stream
/// terminating; the stream ends when the bus is dropped.
pub type NotificationStream =
    Pin<Box<dyn Stream<Item = Result<Notification, EventBusError>> + Send>>;

/// Trait for event bus implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to support concurrent access
/// from reducers, effect tasks, and views.
///
/// # Dyn Compatibility
///
/// This trait uses explicit `Pin<Box<dyn Future>>` returns instead of
/// `async fn` to enable trait object usage (`Arc<dyn EventBus>`). This is
/// required for the effect system where reducers capture the bus in
/// environments and effect futures.
pub trait EventBus: Send + Sync {
    /// Publish a notification to a topic.
    ///
    /// Publishing is fire-and-forget with respect to subscribers: a full or
    /// lagging subscriber never blocks the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::PublishFailed`] if the publish operation fails.
    fn publish(
        &self,
        topic: &str,
        notification: &Notification,
    ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>>;

    /// Subscribe to one or more topics and receive a stream of notifications.
    ///
    /// Returns a [`NotificationStream`] that yields notifications from all
    /// subscribed topics, in publish order.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::SubscriptionFailed`] if subscription fails.
    fn subscribe(
        &self,
        topics: &[&str],
    ) -> Pin<Box<dyn Future<Output = Result<NotificationStream, EventBusError>> + Send + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_carries_topic_and_payload() {
        let note = Notification::new("recipe-events", serde_json::json!({ "kind": "fetched" }));
        assert_eq!(note.topic, "recipe-events");
        assert_eq!(note.payload["kind"], "fetched");
    }

    #[test]
    fn error_display() {
        let err = EventBusError::Lagged(3);
        assert_eq!(err.to_string(), "Subscriber lagged, 3 notifications skipped");
    }
}
