//! HTTP fare predictor client

use std::time::Duration;

use async_trait::async_trait;
use domain::FarePayload;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::FareApiConfig;
use crate::error::FareApiError;
use crate::response::{ExtractedFare, extract_fare};

/// Predictor response with the extracted fare, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarePrediction {
    /// Fare found under one of the accepted keys
    pub fare: Option<ExtractedFare>,
    /// Response body as returned
    pub raw: Value,
}

/// Trait for fare predictor clients
#[async_trait]
pub trait FarePredictorClient: Send + Sync {
    /// Ask the predictor for a fare
    async fn predict(&self, payload: &FarePayload) -> Result<FarePrediction, FareApiError>;

    /// Endpoint the client talks to
    fn endpoint(&self) -> &str;
}

/// Fare predictor reached over HTTP GET with query parameters
#[derive(Debug)]
pub struct HttpFarePredictor {
    client: Client,
    config: FareApiConfig,
}

impl HttpFarePredictor {
    /// Create a new predictor client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &FareApiConfig) -> Result<Self, FareApiError> {
        config.validate().map_err(FareApiError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FareApiError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl FarePredictorClient for HttpFarePredictor {
    #[instrument(skip(self, payload))]
    async fn predict(&self, payload: &FarePayload) -> Result<FarePrediction, FareApiError> {
        let params = payload.query_pairs();

        debug!(
            endpoint = %self.config.endpoint,
            pickup_datetime = %payload.pickup_datetime,
            "Requesting fare prediction"
        );

        let response = self
            .client
            .get(&self.config.endpoint)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FareApiError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    FareApiError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FareApiError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(FareApiError::RequestFailed(format!("HTTP {status}")));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| FareApiError::ParseError(e.to_string()))?;

        let fare = extract_fare(&raw);
        match fare {
            Some(found) => debug!(key = found.key, amount = found.amount, "Fare predicted"),
            None => warn!("Predictor response has no fare under any accepted key"),
        }

        Ok(FarePrediction { fare, raw })
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}
