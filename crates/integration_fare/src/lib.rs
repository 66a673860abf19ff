//! Remote fare prediction integration for TripFare
//!
//! Calls an external predictor over HTTP GET with the six trip parameters of
//! [`domain::FarePayload`] and reads the fare from the first accepted key in
//! [`FARE_RESPONSE_KEYS`]. A response without any accepted key is a
//! successful call with no fare, not an error.

mod client;
mod config;
mod error;
mod response;

pub use client::{FarePrediction, FarePredictorClient, HttpFarePredictor};
pub use config::FareApiConfig;
pub use error::FareApiError;
pub use response::{ExtractedFare, FARE_RESPONSE_KEYS, extract_fare};
