//! # Recipe Client Core
//!
//! Core traits and types for the recipe client architecture.
//!
//! This crate provides the fundamental abstractions for building the client as
//! a unidirectional state container: views dispatch actions, a reducer applies
//! them to state and describes side effects, and the runtime executes those
//! effects and feeds resulting actions back in.
//!
//! ## Core Concepts
//!
//! - **State**: the cached domain data (e.g. the recipe collection)
//! - **Action**: all possible inputs to a reducer (commands and sync events)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution); HTTP calls live here
//! - **Environment**: injected dependencies via traits and handles
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment (no ambient globals)

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub mod event_bus;

/// Reducer module - The core trait for client state logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all state transitions and are deterministic and testable; the
/// only way cached state ever changes is a reducer applying an action.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for RecipeReducer {
    ///     type State = RecipeState;
    ///     type Action = RecipeAction;
    ///     type Environment = RecipeEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut RecipeState,
    ///         action: RecipeAction,
    ///         env: &RecipeEnvironment,
    ///     ) -> SmallVec<[Effect<RecipeAction>; 4]> {
    ///         // State transitions and effect descriptions here
    ///         SmallVec::new()
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable. Every remote call the client
/// makes (the auth status check, the four recipe CRUD calls) is expressed
/// as an [`effect::Effect::Future`] resolving to a follow-up action.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for debounce-style followups)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer. A navigation away does not abort a pending future; a
        /// late resolution simply feeds its action through the reducer, which
        /// decides whether it still matters.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter, so reducers stay pure and testable.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Clone, Copy, Debug, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Fixed clock for deterministic tests
    #[derive(Clone, Copy, Debug)]
    pub struct FixedClock {
        /// The instant this clock always reports
        pub time: DateTime<Utc>,
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, FixedClock, SystemClock};
    use chrono::TimeZone;

    #[test]
    fn system_clock_advances() {
        let a = SystemClock.now();
        let b = SystemClock.now();
        assert!(b >= a);
    }

    #[test]
    fn fixed_clock_is_fixed() {
        let time = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single();
        let time = time.unwrap_or_default();
        let clock = FixedClock { time };
        assert_eq!(clock.now(), time);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn effect_debug_formats() {
        let none: Effect<u32> = Effect::None;
        assert_eq!(format!("{none:?}"), "Effect::None");

        let fut: Effect<u32> = Effect::future(async { Some(1) });
        assert_eq!(format!("{fut:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn effect_merge_builds_parallel() {
        let merged: Effect<u32> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref inner) if inner.len() == 2));
    }
}
