//! Remote fare prediction port

use async_trait::async_trait;
use domain::FarePayload;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Answer from the remote predictor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteFare {
    /// Predicted fare, `None` when no accepted key held a number
    pub fare: Option<f64>,
    /// Response key the fare was read from
    pub key: Option<String>,
    /// Response body as returned
    pub raw: Value,
}

/// Fare prediction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FareError {
    /// Predictor answered 429
    #[error("Too many requests to the fare predictor, retry later")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Remote prediction is switched off
    #[error("Remote fare prediction is disabled")]
    Disabled,

    /// Any other failure
    #[error("Fare prediction failed: {0}")]
    Failed(String),
}

/// Port for the remote fare predictor
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FarePort: Send + Sync {
    /// Ask the predictor for a fare
    async fn predict(&self, payload: &FarePayload) -> Result<RemoteFare, FareError>;

    /// Endpoint requests are sent to
    fn endpoint(&self) -> String;
}
