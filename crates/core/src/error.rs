//! Error types for the Metodo domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each external collaborator has its own error type.

use thiserror::Error;

/// The top-level error type for all Metodo operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Knowledge-base store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Chat-completion errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl Error {
    /// Whether this error means the requested record does not exist upstream.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound(_)))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures talking to the knowledge-base store (Notion).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("API request failed: {message} (status: {status_code}, code: {code})")]
    ApiError {
        status_code: u16,
        code: String,
        message: String,
    },

    #[error("Rate limited by store, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Failures talking to the chat-completion service.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}
