//! API client configuration.
//!
//! Configuration values should be provided by the application, not hardcoded;
//! the defaults match the development backend.

/// Configuration for [`crate::ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to
    /// (e.g. `http://localhost:8080/api`).
    pub base_url: String,
}

impl ApiConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_owned(),
        }
    }
}
