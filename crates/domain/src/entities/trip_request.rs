//! Trip request validation
//!
//! Every issue is collected so callers can show the full list at once,
//! before any network call is made.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FarePayload, TripState};
use crate::errors::DomainError;
use crate::value_objects::{GeoPoint, TripField};

/// A single reason a trip request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// An endpoint lies outside latitude/longitude range
    CoordinatesOutOfBounds { field: TripField },
    /// Fewer than one passenger
    PassengerCount,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordinatesOutOfBounds { field } => {
                write!(f, "{}: coordinates out of bounds.", field.label())
            },
            Self::PassengerCount => write!(f, "Passengers must be ≥ 1."),
        }
    }
}

/// A validated request to route and price a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub pickup: GeoPoint,
    pub dropoff: GeoPoint,
    pub pickup_datetime: NaiveDateTime,
    pub passengers: u32,
}

impl TripRequest {
    /// Validate endpoints and passenger count
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TripValidation` with every issue found.
    pub fn new(
        pickup: GeoPoint,
        dropoff: GeoPoint,
        pickup_datetime: NaiveDateTime,
        passengers: u32,
    ) -> Result<Self, DomainError> {
        let issues = validate_trip(&pickup, &dropoff, passengers);
        if !issues.is_empty() {
            return Err(DomainError::TripValidation(issues));
        }

        Ok(Self {
            pickup,
            dropoff,
            pickup_datetime,
            passengers,
        })
    }

    /// Build from the current trip state
    pub fn from_state(
        state: &TripState,
        pickup_datetime: NaiveDateTime,
        passengers: u32,
    ) -> Result<Self, DomainError> {
        Self::new(state.pickup(), state.dropoff(), pickup_datetime, passengers)
    }

    /// Predictor parameters for this trip
    #[must_use]
    pub fn fare_payload(&self) -> FarePayload {
        FarePayload::new(self.pickup_datetime, self.pickup, self.dropoff, self.passengers)
    }
}

/// Collect all validation issues for a trip, pickup before dropoff
#[must_use]
pub fn validate_trip(
    pickup: &GeoPoint,
    dropoff: &GeoPoint,
    passengers: u32,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (field, point) in [(TripField::Pickup, pickup), (TripField::Dropoff, dropoff)] {
        if !point.is_valid() {
            issues.push(ValidationIssue::CoordinatesOutOfBounds { field });
        }
    }

    if passengers < 1 {
        issues.push(ValidationIssue::PassengerCount);
    }

    issues
}
