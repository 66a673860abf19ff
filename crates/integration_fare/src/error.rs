//! Fare API error types

use thiserror::Error;

/// Errors that can occur while calling the fare predictor
#[derive(Debug, Error)]
pub enum FareApiError {
    /// Connection to the predictor failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Predictor answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body was not JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl FareApiError {
    /// Whether the predictor throttled the request
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }
}
