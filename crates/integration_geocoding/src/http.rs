//! Shared request plumbing for provider clients

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{GeocodingConfig, GeocodingError};

pub(crate) fn build_client(config: &GeocodingConfig) -> Result<Client, GeocodingError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))
}

/// Send a request, classifying transport failures and throttling
pub(crate) async fn send(
    request: RequestBuilder,
    timeout_secs: u64,
) -> Result<Response, GeocodingError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            GeocodingError::Timeout { timeout_secs }
        } else {
            GeocodingError::ConnectionFailed(e.to_string())
        }
    })?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodingError::RateLimitExceeded {
            retry_after_secs: response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok()),
        });
    }

    Ok(response)
}

/// Reject non-success statuses and decode the body
pub(crate) async fn parse_body<T: DeserializeOwned>(
    response: Response,
) -> Result<T, GeocodingError> {
    let status = response.status();
    if !status.is_success() {
        return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

    serde_json::from_str(&body).map_err(|e| GeocodingError::ParseError(e.to_string()))
}

/// Read a coordinate given as a JSON number or a numeric string
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

/// First candidate that is present and not blank
pub(crate) fn first_non_empty<'a>(
    candidates: impl IntoIterator<Item = Option<&'a str>>,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}
