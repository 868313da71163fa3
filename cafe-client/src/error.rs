//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend URL missing from configuration
    #[error("API URL is not configured. Set CAFE_API_URL")]
    NotConfigured,

    /// URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection refused, DNS failure or timeout
    #[error("Cannot connect to backend at {base_url}: {source}")]
    Unreachable {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Configuration defect rather than a user or network problem
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::NotConfigured | ClientError::InvalidUrl(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
