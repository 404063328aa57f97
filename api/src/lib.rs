//! # Recipe Client API
//!
//! HTTP adapter for the recipe backend's REST API.
//!
//! The backend authenticates with a cookie session and an anti-forgery token:
//! the session cookie and the `XSRF-TOKEN` cookie are owned by the backend and
//! opaque to this client, which only stores them in a shared jar and echoes
//! the token back in the `X-XSRF-TOKEN` request header.
//!
//! ## Endpoints
//!
//! Relative to the configured base URL (default `http://localhost:8080/api`):
//!
//! - `GET /auth/status`: 200 when the session is live, 401 otherwise
//! - `POST /auth/login`, `POST /auth/logout`
//! - `GET /recipes`, `POST /recipes`, `PUT /recipes/{id}`, `DELETE /recipes/{id}`
//!
//! ## Example
//!
//! ```ignore
//! use recipe_client_api::{ApiClient, ApiConfig};
//!
//! let client = ApiClient::new(ApiConfig::default())?;
//! let recipes = client.list_recipes().await?;
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::ApiError;
pub use types::{Credentials, Recipe, RecipeDraft, RecipeId};
