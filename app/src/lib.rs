//! Recipe manager client application.
//!
//! Wires the reducer architecture to the recipe backend:
//!
//! - [`state`]: the cached recipe collection and the actions that drive it
//! - [`reducer`]: the recipe reducer, its environment, and cache sync rules
//! - [`guard`]: session-aware navigation guards
//! - [`router`]: route table and navigation decisions
//!
//! The store owns the cache; every mutation flows through
//! [`reducer::RecipeReducer`] as an action. Commands trigger backend calls as
//! effects, and the resulting events both update the cache and publish
//! notifications on the `recipe-events` bus topic.

pub mod guard;
pub mod reducer;
pub mod router;
pub mod state;

pub use guard::{GuardDecision, NavigationGuard, SessionGuard};
pub use reducer::{RECIPE_EVENTS_TOPIC, RecipeEnvironment, RecipeReducer};
pub use router::{Navigation, RouteDescriptor, Router};
pub use state::{RecipeAction, RecipeState, SyncOperation};
