//! Geographic point value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilometres per degree used by the straight-line approximation
pub const KM_PER_DEGREE: f64 = 111.0;

/// Mean earth radius used by the haversine distance
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point with latitude and longitude in degrees
///
/// Equality is exact float comparison. Use [`GeoPoint::differs_from`] when a
/// tolerance is needed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lng: f64,
}

/// Error type for out-of-range coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoPoint {
    /// Create a new point with bounds validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        let point = Self { lat, lng };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(InvalidCoordinates)
        }
    }

    /// Create a point without validation
    ///
    /// Map widgets can report wrapped longitudes for clicks; such points are
    /// accepted here and rejected by trip validation before any request.
    #[must_use]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Whether both coordinates are finite and inside their ranges
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Planar Euclidean distance in raw degrees
    ///
    /// Not corrected for latitude; used for nearest-marker selection and the
    /// straight-line route approximation.
    #[must_use]
    pub fn degree_distance(&self, other: &Self) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }

    /// Crude kilometre distance treating one degree as 111 km everywhere
    #[must_use]
    pub fn approx_km(&self, other: &Self) -> f64 {
        self.degree_distance(other) * KM_PER_DEGREE
    }

    /// Great-circle distance in kilometres (haversine)
    #[must_use]
    pub fn haversine_km(&self, other: &Self) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lng / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }

    /// Whether either coordinate differs from `other` by more than `epsilon`
    #[must_use]
    pub fn differs_from(&self, other: &Self, epsilon: f64) -> bool {
        (self.lat - other.lat).abs() > epsilon || (self.lng - other.lng).abs() > epsilon
    }

    /// Both coordinates are finite numbers
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Coordinate label with six decimals, `"lat, lng"`
    #[must_use]
    pub fn coordinate_label(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Default trip endpoints
impl GeoPoint {
    /// Times Square, New York
    #[must_use]
    pub const fn times_square() -> Self {
        Self::new_unchecked(40.7580, -73.9855)
    }

    /// Central Park South, New York
    #[must_use]
    pub const fn central_park_south() -> Self {
        Self::new_unchecked(40.7676, -73.9817)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let point = GeoPoint::new(40.758, -73.9855).expect("valid coordinates");
        assert!((point.lat() - 40.758).abs() < f64::EPSILON);
        assert!((point.lng() - -73.9855).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(GeoPoint::new(95.0, 0.0).is_err());
        assert!(GeoPoint::new(-91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, 181.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(!GeoPoint::new_unchecked(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_unchecked_keeps_raw_values() {
        let wrapped = GeoPoint::new_unchecked(40.7, 286.01);
        assert!(!wrapped.is_valid());
        assert!((wrapped.lng() - 286.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degree_distance() {
        let a = GeoPoint::new_unchecked(0.0, 0.0);
        let b = GeoPoint::new_unchecked(3.0, 4.0);
        assert!((a.degree_distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.approx_km(&b) - 555.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new_unchecked(0.0, 0.0);
        let b = GeoPoint::new_unchecked(1.0, 0.0);
        assert!((a.haversine_km(&b) - 111.19).abs() < 0.1);
    }

    #[test]
    fn test_haversine_shrinks_with_latitude() {
        let equator =
            GeoPoint::new_unchecked(0.0, 0.0).haversine_km(&GeoPoint::new_unchecked(0.0, 1.0));
        let nyc =
            GeoPoint::new_unchecked(40.7, 0.0).haversine_km(&GeoPoint::new_unchecked(40.7, 1.0));
        assert!(nyc < equator);
    }

    #[test]
    fn test_differs_from() {
        let a = GeoPoint::times_square();
        let same = GeoPoint::new_unchecked(a.lat() + 1e-12, a.lng());
        let moved = GeoPoint::new_unchecked(a.lat(), a.lng() + 1e-6);
        assert!(!a.differs_from(&same, 1e-10));
        assert!(a.differs_from(&moved, 1e-10));
    }

    #[test]
    fn test_coordinate_label() {
        let point = GeoPoint::new_unchecked(40.758, -73.9855);
        assert_eq!(point.coordinate_label(), "40.758000, -73.985500");
        assert_eq!(point.to_string(), point.coordinate_label());
    }

    #[test]
    fn test_is_finite() {
        assert!(GeoPoint::new_unchecked(40.7, -433.9).is_finite());
        assert!(!GeoPoint::new_unchecked(f64::NAN, 0.0).is_finite());
        assert!(!GeoPoint::new_unchecked(40.7, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_serialization() {
        let point = GeoPoint::times_square();
        let json = serde_json::to_string(&point).expect("serialize");
        assert_eq!(json, r#"{"lat":40.758,"lng":-73.9855}"#);

        let deserialized: GeoPoint = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(point, deserialized);
    }
}
