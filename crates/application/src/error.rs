//! Application-level errors

use thiserror::Error;

/// Errors raised while wiring the application services
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
