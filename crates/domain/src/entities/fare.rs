//! Fare entities and the local fare heuristic

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Flag-drop charge
pub const BASE_FARE: f64 = 3.0;

/// Charge per kilometre
pub const PER_KM_RATE: f64 = 1.8;

/// Surcharge per passenger beyond the first
pub const EXTRA_PASSENGER_FEE: f64 = 0.5;

/// Timestamp layout expected by the fare predictor
pub const PICKUP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local fare heuristic, rounded to cents
///
/// Negative distances are clamped to zero. A passenger count of zero is
/// charged like a single passenger; trip validation rejects it earlier.
#[must_use]
pub fn local_fare_estimate(distance_km: f64, passengers: u32) -> f64 {
    let extra_fee = f64::from(passengers.saturating_sub(1)) * EXTRA_PASSENGER_FEE;
    #[allow(clippy::suboptimal_flops)]
    let fare = BASE_FARE + PER_KM_RATE * distance_km.max(0.0) + extra_fee;
    round_cents(fare)
}

/// Round to two decimals from the exact binary value
///
/// `(x * 100).round() / 100` rounds the already inexact product, which
/// moves near-ties such as 3.045 (stored as 3.04499...) up a cent.
fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Local and remote fare for one trip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareQuote {
    /// Heuristic estimate, always present
    pub local_estimate: f64,
    /// Predictor estimate, absent when the predictor gave no usable number
    pub remote_estimate: Option<f64>,
}

impl FareQuote {
    /// Quote with only the local estimate
    #[must_use]
    pub const fn local_only(local_estimate: f64) -> Self {
        Self {
            local_estimate,
            remote_estimate: None,
        }
    }

    /// The number to show: the remote estimate when present, else the local one
    #[must_use]
    pub fn display_fare(&self) -> f64 {
        self.remote_estimate.unwrap_or(self.local_estimate)
    }
}

/// The six query parameters sent to the fare predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarePayload {
    /// Local pickup time, `YYYY-MM-DD HH:MM:SS`
    pub pickup_datetime: String,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub passenger_count: u32,
}

impl FarePayload {
    /// Build a payload from trip endpoints and a naive local timestamp
    #[must_use]
    pub fn new(
        pickup_datetime: NaiveDateTime,
        pickup: GeoPoint,
        dropoff: GeoPoint,
        passenger_count: u32,
    ) -> Self {
        Self {
            pickup_datetime: pickup_datetime.format(PICKUP_DATETIME_FORMAT).to_string(),
            pickup_longitude: pickup.lng(),
            pickup_latitude: pickup.lat(),
            dropoff_longitude: dropoff.lng(),
            dropoff_latitude: dropoff.lat(),
            passenger_count,
        }
    }

    /// Pickup point
    #[must_use]
    pub const fn pickup(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.pickup_latitude, self.pickup_longitude)
    }

    /// Dropoff point
    #[must_use]
    pub const fn dropoff(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.dropoff_latitude, self.dropoff_longitude)
    }

    /// Query parameters in predictor order
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pickup_datetime", self.pickup_datetime.clone()),
            ("pickup_longitude", self.pickup_longitude.to_string()),
            ("pickup_latitude", self.pickup_latitude.to_string()),
            ("dropoff_longitude", self.dropoff_longitude.to_string()),
            ("dropoff_latitude", self.dropoff_latitude.to_string()),
            ("passenger_count", self.passenger_count.to_string()),
        ]
    }
}
