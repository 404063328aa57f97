//! # Recipe Client Testing
//!
//! Testing utilities and helpers for the recipe client architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment dependencies
//! - A fluent Given/When/Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use recipe_client_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(RecipeReducer)
//!     .with_env(test_environment())
//!     .given_state(RecipeState::default())
//!     .when_action(RecipeAction::FetchRecipes)
//!     .then_state(|state| assert!(state.recipes.is_empty()))
//!     .then_effects(assertions::assert_single_future_effect)
//!     .run();
//! ```

mod reducer_test;

pub use mocks::{RecordingEventBus, test_clock};
pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations for testing.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use recipe_client_core::environment::FixedClock;
    use recipe_client_core::event_bus::{
        EventBus, EventBusError, Notification, NotificationStream,
    };
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which should never
    /// happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock {
            time: DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        }
    }

    /// Event bus that records every published notification.
    ///
    /// Subscriptions yield nothing; use [`RecordingEventBus::published`] to
    /// assert on what a reducer's effects published.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingEventBus {
        published: Arc<Mutex<Vec<Notification>>>,
    }

    impl RecordingEventBus {
        /// Create an empty recording bus.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of everything published so far, in order.
        ///
        /// # Panics
        ///
        /// Panics if the internal mutex is poisoned, which only happens if a
        /// test thread panicked while publishing.
        #[must_use]
        #[allow(clippy::unwrap_used)] // Mutex poison in tests is unrecoverable
        pub fn published(&self) -> Vec<Notification> {
            self.published.lock().unwrap().clone()
        }

        /// Topics of everything published so far, in order.
        #[must_use]
        pub fn topics(&self) -> Vec<String> {
            self.published().into_iter().map(|n| n.topic).collect()
        }
    }

    impl EventBus for RecordingEventBus {
        fn publish(
            &self,
            topic: &str,
            notification: &Notification,
        ) -> Pin<Box<dyn Future<Output = Result<(), EventBusError>> + Send + '_>> {
            let mut notification = notification.clone();
            notification.topic = topic.to_owned();

            #[allow(clippy::unwrap_used)] // Mutex poison in tests is unrecoverable
            self.published.lock().unwrap().push(notification);

            Box::pin(async { Ok(()) })
        }

        fn subscribe(
            &self,
            _topics: &[&str],
        ) -> Pin<Box<dyn Future<Output = Result<NotificationStream, EventBusError>> + Send + '_>>
        {
            Box::pin(async {
                Ok(Box::pin(futures::stream::empty()) as NotificationStream)
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use recipe_client_core::environment::Clock;
    use recipe_client_core::event_bus::{EventBus, Notification};

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[tokio::test]
    async fn recording_bus_captures_in_order() {
        let bus = RecordingEventBus::new();

        bus.publish("a", &Notification::new("a", serde_json::json!(1)))
            .await
            .unwrap();
        bus.publish("b", &Notification::new("b", serde_json::json!(2)))
            .await
            .unwrap();

        assert_eq!(bus.topics(), vec!["a".to_owned(), "b".to_owned()]);
    }
}
