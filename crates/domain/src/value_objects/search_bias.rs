//! Geocoding bias parameters

use serde::{Deserialize, Serialize};

use super::{BoundingBox, GeoPoint};

/// Region hints passed to every geocoding provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBias {
    /// Area results are restricted to
    pub viewbox: BoundingBox,
    /// Point results are ranked by nearness to
    pub proximity: Option<GeoPoint>,
    /// ISO 3166-1 alpha-2 country filter
    pub country: String,
}

impl Default for SearchBias {
    fn default() -> Self {
        Self {
            viewbox: BoundingBox::nyc(),
            proximity: Some(GeoPoint::times_square()),
            country: "US".to_string(),
        }
    }
}

impl SearchBias {
    /// Proximity rendered lon/lat-first, `"lng,lat"`
    #[must_use]
    pub fn proximity_param(&self) -> Option<String> {
        self.proximity.map(|p| format!("{},{}", p.lng(), p.lat()))
    }
}
