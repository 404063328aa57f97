//! Recipe reducer: cache sync rules and backend effects.

use crate::state::{RecipeAction, RecipeState, SyncOperation};
use recipe_client_api::ApiClient;
use recipe_client_core::{
    SmallVec,
    effect::Effect,
    event_bus::{EventBus, Notification},
    reducer::Reducer,
    smallvec,
};
use std::sync::Arc;

/// Bus topic carrying recipe cache change notifications.
pub const RECIPE_EVENTS_TOPIC: &str = "recipe-events";

/// Dependencies injected into the recipe reducer's effects.
#[derive(Clone)]
pub struct RecipeEnvironment {
    /// Backend client, shared with the session guard
    pub api: Arc<ApiClient>,
    /// Bus on which cache change notifications are published
    pub event_bus: Arc<dyn EventBus>,
}

impl RecipeEnvironment {
    /// Bundle the backend client and event bus.
    #[must_use]
    pub fn new(api: Arc<ApiClient>, event_bus: Arc<dyn EventBus>) -> Self {
        Self { api, event_bus }
    }
}

/// Reducer over [`RecipeState`].
///
/// Commands never touch the cache; each one returns a single future effect
/// that calls the backend and feeds the outcome back as an event. Events
/// apply the backend's answer to the cache and publish a notification on
/// [`RECIPE_EVENTS_TOPIC`]. A failed call becomes `SyncFailed`, which records
/// the reason and leaves the cache exactly as it was.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecipeReducer;

impl Reducer for RecipeReducer {
    type State = RecipeState;
    type Action = RecipeAction;
    type Environment = RecipeEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // Commands: one backend call per command, outcome fed back as an event.
            RecipeAction::FetchRecipes => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.list_recipes().await {
                        Ok(recipes) => Some(RecipeAction::RecipesFetched(recipes)),
                        Err(e) => Some(sync_failed(SyncOperation::Fetch, &e)),
                    }
                })]
            }
            RecipeAction::AddRecipe(draft) => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.create_recipe(&draft).await {
                        Ok(recipe) => Some(RecipeAction::RecipeAdded(recipe)),
                        Err(e) => Some(sync_failed(SyncOperation::Add, &e)),
                    }
                })]
            }
            RecipeAction::RemoveRecipe(id) => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.delete_recipe(id).await {
                        Ok(()) => Some(RecipeAction::RecipeRemoved(id)),
                        Err(e) => Some(sync_failed(SyncOperation::Remove, &e)),
                    }
                })]
            }
            RecipeAction::UpdateRecipe(recipe) => {
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.update_recipe(&recipe).await {
                        Ok(stored) => Some(RecipeAction::RecipeUpdated(stored)),
                        Err(e) => Some(sync_failed(SyncOperation::Update, &e)),
                    }
                })]
            }

            // Events: apply the backend's answer to the cache.
            RecipeAction::RecipesFetched(recipes) => {
                tracing::debug!(count = recipes.len(), "Cache replaced from backend");
                state.last_error = None;
                let payload = serde_json::json!({
                    "event": "fetched",
                    "count": recipes.len(),
                });
                state.recipes = recipes;
                smallvec![publish(env, payload)]
            }
            RecipeAction::RecipeAdded(recipe) => {
                let payload = serde_json::json!({
                    "event": "added",
                    "id": recipe.id.as_u64(),
                });
                state.recipes.push(recipe);
                smallvec![publish(env, payload)]
            }
            RecipeAction::RecipeRemoved(id) => {
                state.recipes.retain(|r| r.id != id);
                smallvec![publish(
                    env,
                    serde_json::json!({
                        "event": "removed",
                        "id": id.as_u64(),
                    })
                )]
            }
            RecipeAction::RecipeUpdated(recipe) => {
                let payload = serde_json::json!({
                    "event": "updated",
                    "id": recipe.id.as_u64(),
                });
                if let Some(slot) = state.recipes.iter_mut().find(|r| r.id == recipe.id) {
                    *slot = recipe;
                } else {
                    // The recipe was removed while the update was in flight;
                    // the next fetch settles it.
                    tracing::warn!(id = %recipe.id, "Updated recipe is not cached");
                }
                smallvec![publish(env, payload)]
            }
            RecipeAction::SyncFailed { operation, reason } => {
                tracing::warn!(%operation, %reason, "Backend sync failed");
                state.last_error = Some(format!("{operation}: {reason}"));
                smallvec![publish(
                    env,
                    serde_json::json!({
                        "event": "sync-failed",
                        "operation": operation.to_string(),
                        "reason": reason,
                    })
                )]
            }
        }
    }
}

fn sync_failed(operation: SyncOperation, error: &recipe_client_api::ApiError) -> RecipeAction {
    RecipeAction::SyncFailed {
        operation,
        reason: error.to_string(),
    }
}

/// Publish a notification on the recipe topic as a fire-and-forget effect.
///
/// Publish failures are logged and never fed back into the store.
fn publish(env: &RecipeEnvironment, payload: serde_json::Value) -> Effect<RecipeAction> {
    let bus = Arc::clone(&env.event_bus);
    Effect::future(async move {
        let notification = Notification::new(RECIPE_EVENTS_TOPIC, payload);
        if let Err(e) = bus.publish(RECIPE_EVENTS_TOPIC, &notification).await {
            tracing::warn!(error = %e, "Failed to publish recipe notification");
        }
        None
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use recipe_client_api::{ApiConfig, Recipe, RecipeId};
    use recipe_client_testing::{
        ReducerTest, RecordingEventBus,
        assertions::{assert_single_future_effect, assert_has_future_effect},
    };

    fn test_env() -> RecipeEnvironment {
        let api = ApiClient::new(ApiConfig::default()).expect("default config is valid");
        RecipeEnvironment::new(Arc::new(api), Arc::new(RecordingEventBus::new()))
    }

    fn cached(names: &[(u64, &str)]) -> RecipeState {
        RecipeState {
            recipes: names
                .iter()
                .map(|&(id, name)| Recipe::new(RecipeId::new(id), name))
                .collect(),
            last_error: None,
        }
    }

    #[test]
    fn fetch_command_is_a_single_backend_effect() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup")]))
            .when_action(RecipeAction::FetchRecipes)
            .then_state(|s| assert_eq!(s.recipes.len(), 1, "commands never touch the cache"))
            .then_effects(assert_single_future_effect)
            .run();
    }

    #[test]
    fn add_command_leaves_cache_until_backend_answers() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(RecipeState::default())
            .when_action(RecipeAction::AddRecipe(
                recipe_client_api::RecipeDraft::new("Soup"),
            ))
            .then_state(|s| assert!(s.recipes.is_empty()))
            .then_effects(assert_single_future_effect)
            .run();
    }

    #[test]
    fn fetched_event_replaces_cache_and_clears_error() {
        let fetched = vec![
            Recipe::new(RecipeId::new(3), "Pie"),
            Recipe::new(RecipeId::new(4), "Tart"),
        ];
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(RecipeState {
                recipes: vec![Recipe::new(RecipeId::new(1), "Stale")],
                last_error: Some("fetch: boom".to_owned()),
            })
            .when_action(RecipeAction::RecipesFetched(fetched.clone()))
            .then_state(move |s| {
                assert_eq!(s.recipes, fetched);
                assert!(s.last_error.is_none());
            })
            .then_effects(assert_has_future_effect)
            .run();
    }

    #[test]
    fn added_event_appends_at_the_end() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup"), (2, "Stew")]))
            .when_action(RecipeAction::RecipeAdded(Recipe::new(
                RecipeId::new(3),
                "Pie",
            )))
            .then_state(|s| {
                let names: Vec<_> = s.recipes.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, ["Soup", "Stew", "Pie"]);
            })
            .run();
    }

    #[test]
    fn removed_event_drops_only_the_matching_id() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup"), (2, "Stew"), (3, "Pie")]))
            .when_action(RecipeAction::RecipeRemoved(RecipeId::new(2)))
            .then_state(|s| {
                let names: Vec<_> = s.recipes.iter().map(|r| r.name.as_str()).collect();
                assert_eq!(names, ["Soup", "Pie"]);
            })
            .run();
    }

    #[test]
    fn updated_event_replaces_in_place_keeping_position() {
        let mut replacement = Recipe::new(RecipeId::new(1), "Stew");
        replacement.cooking_time = Some(90);
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup"), (2, "Pie")]))
            .when_action(RecipeAction::RecipeUpdated(replacement))
            .then_state(|s| {
                assert_eq!(s.recipes[0].name, "Stew");
                assert_eq!(s.recipes[0].cooking_time, Some(90));
                assert_eq!(s.recipes[1].name, "Pie");
            })
            .run();
    }

    #[test]
    fn updated_event_for_unknown_id_leaves_cache() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup")]))
            .when_action(RecipeAction::RecipeUpdated(Recipe::new(
                RecipeId::new(9),
                "Ghost",
            )))
            .then_state(|s| {
                assert_eq!(s.recipes.len(), 1);
                assert_eq!(s.recipes[0].name, "Soup");
            })
            .run();
    }

    #[test]
    fn sync_failed_records_reason_and_keeps_cache() {
        ReducerTest::new(RecipeReducer)
            .with_env(test_env())
            .given_state(cached(&[(1, "Soup")]))
            .when_action(RecipeAction::SyncFailed {
                operation: SyncOperation::Remove,
                reason: "backend returned status 500".to_owned(),
            })
            .then_state(|s| {
                assert_eq!(s.recipes.len(), 1);
                assert_eq!(
                    s.last_error.as_deref(),
                    Some("remove: backend returned status 500")
                );
            })
            .run();
    }

    #[tokio::test]
    async fn events_publish_on_the_recipe_topic() {
        let bus = Arc::new(RecordingEventBus::new());
        let api = ApiClient::new(ApiConfig::default()).expect("default config is valid");
        let env = RecipeEnvironment::new(Arc::new(api), Arc::clone(&bus) as Arc<dyn EventBus>);

        let mut state = RecipeState::default();
        let effects = RecipeReducer.reduce(
            &mut state,
            RecipeAction::RecipeAdded(Recipe::new(RecipeId::new(1), "Soup")),
            &env,
        );

        for effect in effects {
            if let Effect::Future(fut) = effect {
                assert!(fut.await.is_none(), "publish effects feed nothing back");
            }
        }

        assert_eq!(bus.topics(), vec![RECIPE_EVENTS_TOPIC.to_owned()]);
        assert_eq!(bus.published()[0].payload["event"], "added");
    }

    mod cache_order {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Add(String),
            Remove(usize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                "[a-z]{1,8}".prop_map(Op::Add),
                (0usize..8).prop_map(Op::Remove),
            ]
        }

        proptest! {
            // The cache preserves insertion order under any interleaving of
            // add and remove events.
            #[test]
            fn matches_insertion_order(ops in proptest::collection::vec(op_strategy(), 0..32)) {
                let env = test_env();
                let mut state = RecipeState::default();

                // Reference model: ids paired with names, in insertion order
                let mut model: Vec<(u64, String)> = Vec::new();
                let mut next_id = 1u64;

                for op in ops {
                    match op {
                        Op::Add(name) => {
                            let id = next_id;
                            next_id += 1;
                            model.push((id, name.clone()));
                            let event =
                                RecipeAction::RecipeAdded(Recipe::new(RecipeId::new(id), name));
                            drop(RecipeReducer.reduce(&mut state, event, &env));
                        }
                        Op::Remove(idx) => {
                            if model.is_empty() {
                                continue;
                            }
                            let (id, _) = model.remove(idx % model.len());
                            let event = RecipeAction::RecipeRemoved(RecipeId::new(id));
                            drop(RecipeReducer.reduce(&mut state, event, &env));
                        }
                    }
                }

                let cached: Vec<(u64, String)> = state
                    .recipes
                    .iter()
                    .map(|r| (r.id.as_u64(), r.name.clone()))
                    .collect();
                prop_assert_eq!(cached, model);
            }
        }
    }
}
