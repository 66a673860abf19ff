//! Bounding box (viewbox) value object

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoPoint;

/// A longitude/latitude bounding box used to bias geocoding results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge
    pub min_lng: f64,
    /// Southern edge
    pub min_lat: f64,
    /// Eastern edge
    pub max_lng: f64,
    /// Northern edge
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a bounding box from lon/lat-first corners
    #[must_use]
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// New York City viewbox
    #[must_use]
    pub const fn nyc() -> Self {
        Self::new(-74.259, 40.477, -73.700, 40.917)
    }

    /// Whether the point lies inside the box (edges inclusive)
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat())
            && (self.min_lng..=self.max_lng).contains(&point.lng())
    }

    /// Render as `"min_lng,min_lat,max_lng,max_lat"` for provider query strings
    #[must_use]
    pub fn to_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lng, self.min_lat, self.max_lng, self.max_lat
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}
