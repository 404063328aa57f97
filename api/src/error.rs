//! Error types for the recipe API client

use thiserror::Error;

/// Errors that can occur when talking to the recipe backend.
///
/// The guard and the store collapse all of these the same way (redirect to
/// login, or log and leave the cache untouched), but keeping transport and
/// HTTP-status failures distinct makes diagnostics readable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, DNS)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        body: String,
    },

    /// The response body could not be decoded as the expected JSON shape
    #[error("Response decoding failed: {0}")]
    Decode(String),

    /// The client configuration is unusable (e.g. malformed base URL)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// HTTP status code, when the backend produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
