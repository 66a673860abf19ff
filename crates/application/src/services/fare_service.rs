//! Fare service
//!
//! Combines the local fare heuristic with the optional remote predictor.
//! The local estimate is always available; remote failures only add a
//! notice.

use std::{fmt, sync::Arc};

use domain::{FarePayload, FareQuote, local_fare_estimate};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::Notice;
use crate::ports::{FareError, FarePort, RemoteFare};

/// Request and response of one predictor call, kept for inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareExchange {
    pub endpoint: String,
    pub request: FarePayload,
    /// Response body, absent when the call failed
    pub response: Option<Value>,
    /// Response key the fare was read from
    pub fare_key: Option<String>,
    /// Failure description, when the call failed
    pub error: Option<String>,
}

/// Quote plus the predictor exchange and any notices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareOutcome {
    pub quote: FareQuote,
    pub exchange: Option<FareExchange>,
    pub notices: Vec<Notice>,
}

/// Service computing fare quotes
pub struct FareService {
    predictor: Option<Arc<dyn FarePort>>,
}

impl fmt::Debug for FareService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FareService")
            .field("remote_enabled", &self.predictor.is_some())
            .finish()
    }
}

impl FareService {
    /// Create a fare service backed by a remote predictor
    pub fn new(predictor: Arc<dyn FarePort>) -> Self {
        Self {
            predictor: Some(predictor),
        }
    }

    /// Create a fare service that only uses the local heuristic
    #[must_use]
    pub const fn local_only() -> Self {
        Self { predictor: None }
    }

    #[must_use]
    pub const fn remote_enabled(&self) -> bool {
        self.predictor.is_some()
    }

    /// Endpoint of the remote predictor, if one is configured
    #[must_use]
    pub fn remote_endpoint(&self) -> Option<String> {
        self.predictor.as_ref().map(|p| p.endpoint())
    }

    /// Local heuristic estimate
    #[must_use]
    pub fn local_estimate(&self, distance_km: f64, passengers: u32) -> f64 {
        local_fare_estimate(distance_km, passengers)
    }

    /// Ask the remote predictor directly
    ///
    /// # Errors
    ///
    /// Returns `FareError::Disabled` when no predictor is configured, or the
    /// predictor's own failure.
    #[instrument(skip(self, payload))]
    pub async fn remote_estimate(&self, payload: &FarePayload) -> Result<RemoteFare, FareError> {
        let predictor = self.predictor.as_ref().ok_or(FareError::Disabled)?;
        predictor.predict(payload).await
    }

    /// Local estimate for `distance_km`, plus the remote prediction when enabled
    ///
    /// A missing or failed remote prediction leaves `remote_estimate` empty
    /// and adds a warning.
    #[instrument(skip(self, payload))]
    pub async fn quote(&self, payload: &FarePayload, distance_km: f64) -> FareOutcome {
        let local = self.local_estimate(distance_km, payload.passenger_count);
        let mut outcome = FareOutcome {
            quote: FareQuote::local_only(local),
            exchange: None,
            notices: Vec::new(),
        };

        let Some(predictor) = &self.predictor else {
            debug!("Remote prediction disabled, local estimate only");
            return outcome;
        };

        let mut exchange = FareExchange {
            endpoint: predictor.endpoint(),
            request: payload.clone(),
            response: None,
            fare_key: None,
            error: None,
        };

        match predictor.predict(payload).await {
            Ok(remote) => {
                exchange.fare_key.clone_from(&remote.key);
                exchange.response = Some(remote.raw);
                match remote.fare {
                    Some(fare) => outcome.quote.remote_estimate = Some(fare),
                    None => outcome.notices.push(Notice::warning(
                        "Fare API returned no fare; showing the local estimate.",
                    )),
                }
            },
            Err(err) => {
                warn!(error = %err, "Remote fare prediction failed");
                let message = match &err {
                    FareError::RateLimited { .. } => {
                        "Fare API: too many requests, retry later. Showing the local estimate."
                            .to_string()
                    },
                    other => format!("{other}. Showing the local estimate."),
                };
                outcome.notices.push(Notice::warning(message));
                exchange.error = Some(err.to_string());
            },
        }

        outcome.exchange = Some(exchange);
        outcome
    }
}
