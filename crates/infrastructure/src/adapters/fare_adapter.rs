//! Fare predictor adapter - Implements FarePort using integration_fare

use application::error::ApplicationError;
use application::ports::{FareError, FarePort, RemoteFare};
use async_trait::async_trait;
use domain::FarePayload;
use integration_fare::{
    FareApiConfig, FareApiError, FarePrediction, FarePredictorClient, HttpFarePredictor,
};
use tracing::instrument;

/// Adapter for the HTTP fare predictor
#[derive(Debug)]
pub struct FarePredictorAdapter {
    client: HttpFarePredictor,
}

impl FarePredictorAdapter {
    /// Create an adapter with custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: &FareApiConfig) -> Result<Self, ApplicationError> {
        let client = HttpFarePredictor::new(config).map_err(|e| match e {
            FareApiError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Internal(other.to_string()),
        })?;
        Ok(Self { client })
    }

    fn map_prediction(prediction: FarePrediction) -> RemoteFare {
        RemoteFare {
            fare: prediction.fare.map(|f| f.amount),
            key: prediction.fare.map(|f| f.key.to_string()),
            raw: prediction.raw,
        }
    }

    /// Map integration fare error to the port's fare error
    fn map_error(err: FareApiError) -> FareError {
        match err {
            FareApiError::RateLimitExceeded { retry_after_secs } => {
                FareError::RateLimited { retry_after_secs }
            },
            other => FareError::Failed(other.to_string()),
        }
    }
}

#[async_trait]
impl FarePort for FarePredictorAdapter {
    #[instrument(skip(self, payload))]
    async fn predict(&self, payload: &FarePayload) -> Result<RemoteFare, FareError> {
        self.client
            .predict(payload)
            .await
            .map(Self::map_prediction)
            .map_err(Self::map_error)
    }

    fn endpoint(&self) -> String {
        self.client.endpoint().to_string()
    }
}

#[cfg(test)]
mod tests {
    use integration_fare::ExtractedFare;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_map_prediction() {
        let remote = FarePredictorAdapter::map_prediction(FarePrediction {
            fare: Some(ExtractedFare {
                key: "y_pred",
                amount: 12.0,
            }),
            raw: json!({"y_pred": [12.0]}),
        });
        assert_eq!(remote.fare, Some(12.0));
        assert_eq!(remote.key.as_deref(), Some("y_pred"));
    }

    #[test]
    fn test_map_errors() {
        assert_eq!(
            FarePredictorAdapter::map_error(FareApiError::RateLimitExceeded {
                retry_after_secs: None
            }),
            FareError::RateLimited {
                retry_after_secs: None
            }
        );
        assert!(matches!(
            FarePredictorAdapter::map_error(FareApiError::Timeout { timeout_secs: 20 }),
            FareError::Failed(_)
        ));
    }

    #[test]
    fn test_bad_endpoint_is_configuration_error() {
        let config = FareApiConfig {
            endpoint: "ftp://fares".to_string(),
            ..FareApiConfig::for_testing()
        };
        assert!(matches!(
            FarePredictorAdapter::new(&config),
            Err(ApplicationError::Configuration(_))
        ));
    }
}
