//! HTTP client for the recipe backend

use crate::{
    config::ApiConfig,
    error::ApiError,
    types::{Credentials, Recipe, RecipeDraft, RecipeId},
};
use reqwest::{
    Client, StatusCode, Url,
    cookie::{CookieStore, Jar},
    header::{self, HeaderMap, HeaderValue},
};
use std::sync::Arc;

/// Name of the session cookie the backend uses for CSRF protection.
const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Request header that echoes the CSRF cookie value back to the backend.
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Client for the recipe backend REST API.
///
/// Carries a shared cookie jar so the session cookie set by the backend on
/// login is replayed on every subsequent request. If the jar holds an
/// `XSRF-TOKEN` cookie at construction time, its value is echoed as the
/// `X-XSRF-TOKEN` header on all requests.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Create a client with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if the base URL does not parse.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::with_cookie_jar(config, Arc::new(Jar::default()))
    }

    /// Create a client around an existing cookie jar.
    ///
    /// Use this to share a session across clients, or to seed the jar with
    /// cookies obtained elsewhere before the first request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if the base URL does not parse or the
    /// seeded CSRF cookie value is not a valid header value.
    pub fn with_cookie_jar(config: ApiConfig, jar: Arc<Jar>) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let url = Url::parse(&base_url).map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = csrf_token(jar.as_ref(), &url) {
            headers.insert(
                XSRF_HEADER,
                HeaderValue::from_str(&token).map_err(|e| ApiError::InvalidConfig(e.to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| ApiError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    /// The cookie jar backing this client.
    #[must_use]
    pub const fn cookie_jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Check whether the current session is authenticated.
    ///
    /// Any 2xx answer counts as an authenticated session; the backend is
    /// free to reply 200 or 204. A 401 is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or unexpected status codes.
    pub async fn auth_status(&self) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(format!("{}/auth/status", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            _ => Err(status_error(response).await),
        }
    }

    /// Open a session. The backend answers with a session cookie that the
    /// jar retains for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with code 401 for bad credentials, and
    /// errors for network failures or other unexpected status codes.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(username = %credentials.username, "session opened");
                Ok(())
            }
            _ => Err(status_error(response).await),
        }
    }

    /// Close the current session.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or non-success status codes.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(format!("{}/auth/logout", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            _ => Err(status_error(response).await),
        }
    }

    /// Fetch the full recipe collection.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, error status codes, or
    /// undecodable bodies.
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let response = self
            .client
            .get(format!("{}/recipes", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<Recipe>>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            _ => Err(status_error(response).await),
        }
    }

    /// Create a recipe. The backend assigns the id and returns the stored
    /// record.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, error status codes, or
    /// undecodable bodies.
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiError> {
        let response = self
            .client
            .post(format!("{}/recipes", self.base_url))
            .json(draft)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => response
                .json::<Recipe>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            _ => Err(status_error(response).await),
        }
    }

    /// Replace a recipe. The id in the record selects the target; the backend
    /// returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, error status codes, or
    /// undecodable bodies.
    pub async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let response = self
            .client
            .put(format!("{}/recipes/{}", self.base_url, recipe.id))
            .json(recipe)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<Recipe>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string())),
            _ => Err(status_error(response).await),
        }
    }

    /// Delete a recipe by id.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or error status codes.
    pub async fn delete_recipe(&self, id: RecipeId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/recipes/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            _ => Err(status_error(response).await),
        }
    }
}

/// Read the CSRF token from the jar's cookies for the backend origin.
fn csrf_token(jar: &Jar, url: &Url) -> Option<String> {
    let cookies = jar.cookies(url)?;
    let raw = cookies.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(XSRF_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_owned)
    })
}

/// Turn a non-success response into a status error, consuming the body.
async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status, "backend returned an error status");
    ApiError::Status { status, body }
}
