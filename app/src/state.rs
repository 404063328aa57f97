//! State and actions for the recipe store.

use recipe_client_api::{Recipe, RecipeDraft, RecipeId};

/// Client-side cache of the recipe collection.
///
/// Order mirrors the backend: a fetch replaces the whole collection, and
/// local adds append at the end, matching where the backend lists them on
/// the next fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeState {
    /// Cached recipes in backend order
    pub recipes: Vec<Recipe>,
    /// Human-readable note about the most recent failed sync, cleared by
    /// the next successful fetch
    pub last_error: Option<String>,
}

impl RecipeState {
    /// Look up a cached recipe by id.
    #[must_use]
    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

/// Which backend operation a sync failure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOperation {
    /// Fetching the collection
    Fetch,
    /// Creating a recipe
    Add,
    /// Deleting a recipe
    Remove,
    /// Replacing a recipe
    Update,
}

impl std::fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Actions processed by the recipe reducer.
///
/// Commands express user intent and trigger a backend call as an effect.
/// Events are the outcomes those effects feed back; only events mutate the
/// cache, so state never changes before the backend has answered.
#[derive(Clone, Debug)]
pub enum RecipeAction {
    /// Command: reload the collection from the backend
    FetchRecipes,
    /// Command: create a recipe on the backend
    AddRecipe(RecipeDraft),
    /// Command: delete a recipe on the backend
    RemoveRecipe(RecipeId),
    /// Command: replace a recipe on the backend
    UpdateRecipe(Recipe),

    /// Event: the backend served the full collection
    RecipesFetched(Vec<Recipe>),
    /// Event: the backend stored a new recipe
    RecipeAdded(Recipe),
    /// Event: the backend deleted a recipe
    RecipeRemoved(RecipeId),
    /// Event: the backend replaced a recipe
    RecipeUpdated(Recipe),
    /// Event: a backend call failed; the cache is left untouched
    SyncFailed {
        /// The operation that failed
        operation: SyncOperation,
        /// Failure detail, suitable for logs and display
        reason: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    #[test]
    fn recipe_lookup_by_id() {
        let state = RecipeState {
            recipes: vec![
                Recipe::new(RecipeId::new(1), "Soup"),
                Recipe::new(RecipeId::new(2), "Stew"),
            ],
            last_error: None,
        };

        assert_eq!(state.recipe(RecipeId::new(2)).unwrap().name, "Stew");
        assert!(state.recipe(RecipeId::new(3)).is_none());
    }

    #[test]
    fn sync_operation_display() {
        assert_eq!(SyncOperation::Remove.to_string(), "remove");
    }
}
