//! OSRM response models

use domain::GeoPoint;
use serde::Deserialize;

/// Top-level `/route` response
#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    /// `"Ok"` on success
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route candidate
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Metres
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub geometry: OsrmGeometry,
}

/// GeoJSON line geometry with longitude-first pairs
#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl OsrmGeometry {
    /// Swap `[lng, lat]` pairs into latitude-first points
    #[must_use]
    pub fn to_path(&self) -> Vec<GeoPoint> {
        self.coordinates
            .iter()
            .map(|[lng, lat]| GeoPoint::new_unchecked(*lat, *lng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_swap() {
        let geometry = OsrmGeometry {
            coordinates: vec![[-73.9855, 40.758], [-73.9817, 40.7676]],
        };
        let path = geometry.to_path();
        assert_eq!(
            path,
            vec![
                GeoPoint::new_unchecked(40.758, -73.9855),
                GeoPoint::new_unchecked(40.7676, -73.9817),
            ]
        );
    }

    #[test]
    fn test_error_response_parses() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let response: OsrmResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.code, "NoRoute");
        assert!(response.routes.is_empty());
    }
}
