//! Wire types for the recipe backend REST API.
//!
//! The backend owns these records; the client treats everything past the
//! required identity and name as open data. Unknown fields round-trip through
//! the flattened extension map so a newer backend never breaks this client.

use serde::{Deserialize, Serialize};

/// Unique identifier for a recipe, assigned by the backend on create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(u64);

impl RecipeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecipeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A recipe record as served by the backend.
///
/// `id` and `name` are required; everything else is optional or open. The
/// client never interprets ingredients or tags, it only caches and displays
/// them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Backend-assigned identity, unique within the collection
    pub id: RecipeId,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cooking time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<u32>,

    /// Ingredient records, carried opaquely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<serde_json::Value>,

    /// Tag labels, carried opaquely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Any additional fields the backend serves
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Recipe {
    /// Minimal recipe with just an id and a name.
    #[must_use]
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            cooking_time: None,
            ingredients: Vec::new(),
            tags: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A recipe without an identity, used for create calls.
///
/// The backend assigns the id and echoes the complete record back.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cooking time in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<u32>,

    /// Ingredient records, carried opaquely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<serde_json::Value>,

    /// Tag labels, carried opaquely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl RecipeDraft {
    /// Draft with a name and nothing else.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the cooking time in minutes.
    #[must_use]
    pub const fn with_cooking_time(mut self, minutes: u32) -> Self {
        self.cooking_time = Some(minutes);
        self
    }
}

/// Login credentials for the session endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Build credentials from anything string-like.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}
