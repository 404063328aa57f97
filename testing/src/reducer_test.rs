//! Given/When/Then harness for reducer tests.
//!
//! A reducer is a pure function, so its tests need no runtime: set up a
//! state, apply one action, then assert on the mutated state and on the
//! effect descriptions that came back. Effects are inspected, never executed;
//! integration tests cover execution through a real `Store`.

use recipe_client_core::{effect::Effect, reducer::Reducer};

type StateCheck<S> = Box<dyn FnOnce(&S)>;
type EffectCheck<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent builder for single-action reducer tests.
///
/// ```ignore
/// ReducerTest::new(RecipeReducer)
///     .with_env(test_env())
///     .given_state(RecipeState::default())
///     .when_action(RecipeAction::FetchRecipes)
///     .then_state(|s| assert!(s.recipes.is_empty()))
///     .then_effects(assertions::assert_single_future_effect)
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    env: Option<E>,
    state: Option<S>,
    action: Option<A>,
    state_checks: Vec<StateCheck<S>>,
    effect_checks: Vec<EffectCheck<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Start a test around a reducer.
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            env: None,
            state: None,
            action: None,
            state_checks: Vec::new(),
            effect_checks: Vec::new(),
        }
    }

    /// Supply the environment the reducer will see.
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Given: the state before the action.
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.state = Some(state);
        self
    }

    /// When: the single action under test.
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Then: a check against the state after the action. May be chained.
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_checks.push(Box::new(check));
        self
    }

    /// Then: a check against the returned effect descriptions. May be chained.
    #[must_use]
    pub fn then_effects<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_checks.push(Box::new(check));
        self
    }

    /// Apply the action and run every registered check.
    ///
    /// # Panics
    ///
    /// Panics if environment, state, or action were never supplied, or if a
    /// check fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let env = self.env.expect("with_env() was never called");
        let mut state = self.state.expect("given_state() was never called");
        let action = self.action.expect("when_action() was never called");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for check in self.state_checks {
            check(&state);
        }
        for check in self.effect_checks {
            check(&effects);
        }
    }
}

/// Ready-made effect checks for `then_effects`.
pub mod assertions {
    use recipe_client_core::effect::Effect;

    /// Assert the reducer returned at least one `Effect::Future`.
    ///
    /// # Panics
    ///
    /// Panics if no future effect is present.
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "expected a future effect, got {} other effect(s)",
            effects.len()
        );
    }

    /// Assert the reducer returned exactly one effect, and that it is a
    /// `Effect::Future`. The shape every store command must have.
    ///
    /// # Panics
    ///
    /// Panics if the effect list is anything other than a single future.
    pub fn assert_single_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            matches!(effects, [Effect::Future(_)]),
            "expected exactly one future effect, got {} effect(s)",
            effects.len()
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can panic
mod tests {
    use super::*;
    use recipe_client_core::{SmallVec, smallvec};

    // Minimal cache-sync reducer in the command/event shape the harness is
    // built for: Save describes a remote call, Saved applies its outcome.
    #[derive(Clone, Debug)]
    enum TagAction {
        Save(String),
        Saved(String),
    }

    #[derive(Clone, Debug, Default)]
    struct TagState {
        tags: Vec<String>,
    }

    struct TagReducer;

    impl Reducer for TagReducer {
        type State = TagState;
        type Action = TagAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TagState,
            action: TagAction,
            _env: &(),
        ) -> SmallVec<[Effect<TagAction>; 4]> {
            match action {
                TagAction::Save(tag) => {
                    smallvec![Effect::future(async move { Some(TagAction::Saved(tag)) })]
                }
                TagAction::Saved(tag) => {
                    state.tags.push(tag);
                    SmallVec::new()
                }
            }
        }
    }

    #[test]
    fn command_leaves_state_and_describes_an_effect() {
        ReducerTest::new(TagReducer)
            .with_env(())
            .given_state(TagState::default())
            .when_action(TagAction::Save("QUICK".to_owned()))
            .then_state(|s| assert!(s.tags.is_empty()))
            .then_effects(assertions::assert_single_future_effect)
            .run();
    }

    #[test]
    fn event_mutates_state_without_effects() {
        ReducerTest::new(TagReducer)
            .with_env(())
            .given_state(TagState {
                tags: vec!["QUICK".to_owned()],
            })
            .when_action(TagAction::Saved("VEGAN".to_owned()))
            .then_state(|s| assert_eq!(s.tags, ["QUICK", "VEGAN"]))
            .then_effects(|effects| assert!(effects.is_empty()))
            .run();
    }

    #[test]
    #[should_panic(expected = "given_state() was never called")]
    fn run_requires_a_starting_state() {
        ReducerTest::new(TagReducer)
            .with_env(())
            .when_action(TagAction::Save("QUICK".to_owned()))
            .run();
    }

    #[test]
    #[should_panic(expected = "expected exactly one future effect")]
    fn single_future_check_rejects_empty_effects() {
        let effects: Vec<Effect<TagAction>> = Vec::new();
        assertions::assert_single_future_effect(&effects);
    }
}
