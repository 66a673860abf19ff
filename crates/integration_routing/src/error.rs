//! Routing error types

use thiserror::Error;

/// Errors that can occur during routing
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Service answered but did not report success
    #[error("Routing service returned code {code}: {message}")]
    Unsuccessful {
        /// OSRM status code (e.g. "NoRoute")
        code: String,
        /// Accompanying message, possibly empty
        message: String,
    },

    /// Successful response without any route
    #[error("No route found")]
    NoRoute,

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Whether a 2xx response carried an unusable payload
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::ParseError(_) | Self::Unsuccessful { .. } | Self::NoRoute
        )
    }
}
