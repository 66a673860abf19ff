//! API error handling
//!
//! Every error leaves the server as a JSON [`ErrorResponse`] with a stable
//! `code` string.

use application::FareError;
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Trip input rejected; each entry is one user-facing message
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Individual validation messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_failed",
            Self::NotFound(_) => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::Upstream(_) => "upstream_error",
            Self::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let retry_after = match &self {
            Self::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        };

        let (error, details) = match self {
            Self::Validation(messages) => ("Trip request is invalid".to_string(), messages),
            Self::RateLimited { .. } => {
                ("Rate limit exceeded, retry later".to_string(), Vec::new())
            },
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::Upstream(msg)
            | Self::ServiceUnavailable(msg) => (msg, Vec::new()),
        };

        let mut response = (status, Json(ErrorResponse { error, code, details })).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::TripValidation(_) => Self::Validation(err.messages()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<FareError> for ApiError {
    fn from(err: FareError) -> Self {
        match err {
            FareError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            FareError::Disabled => Self::ServiceUnavailable(err.to_string()),
            FareError::Failed(_) => Self::Upstream(err.to_string()),
        }
    }
}
