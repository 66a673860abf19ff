//! Geocoding suggestion

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// A single place candidate returned by a geocoding or autocomplete provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable place label
    pub label: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Suggestion {
    /// Create a new suggestion
    pub fn new(label: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            label: label.into(),
            lat,
            lng,
        }
    }

    /// The suggestion's coordinates as a point
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.lat, self.lng)
    }
}
