//! Route result entity and straight-line fallback

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Average speed assumed by the straight-line fallback, km/h
pub const FALLBACK_SPEED_KMH: f64 = 22.0;

/// Travel profile understood by the routing backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    /// Car routing
    #[default]
    Driving,
    /// Pedestrian routing
    Walking,
    /// Bicycle routing
    Cycling,
}

impl RouteProfile {
    /// Path segment used by the routing backend
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl std::fmt::Display for RouteProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RouteProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "walking" | "foot" => Ok(Self::Walking),
            "cycling" | "bike" => Ok(Self::Cycling),
            _ => Err(format!("Invalid profile: {s}")),
        }
    }
}

/// How the straight-line fallback measures distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackDistance {
    /// Euclidean degrees × 111 km, ignoring latitude
    #[default]
    DegreeApprox,
    /// Great-circle distance
    Haversine,
}

/// Where a route's numbers came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    /// Road routing backend
    Routed,
    /// Local straight-line approximation
    StraightLine,
}

/// A resolved trip route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Total distance in kilometres
    pub distance_km: f64,
    /// Total duration in minutes
    pub duration_min: f64,
    /// Latitude-first path from pickup to dropoff
    pub path: Vec<GeoPoint>,
    /// Origin of the numbers
    pub source: RouteSource,
}

impl RouteResult {
    /// Straight-line estimate used when the routing backend is unavailable
    #[must_use]
    pub fn straight_line(from: GeoPoint, to: GeoPoint, method: FallbackDistance) -> Self {
        let distance_km = match method {
            FallbackDistance::DegreeApprox => from.approx_km(&to),
            FallbackDistance::Haversine => from.haversine_km(&to),
        };

        Self {
            distance_km,
            duration_min: distance_km / (FALLBACK_SPEED_KMH / 60.0),
            path: vec![from, to],
            source: RouteSource::StraightLine,
        }
    }

    /// Whether this route came from the routing backend
    #[must_use]
    pub fn is_routed(&self) -> bool {
        self.source == RouteSource::Routed
    }

    /// Whole minutes, truncated, as shown to users
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn whole_minutes(&self) -> u64 {
        self.duration_min.max(0.0) as u64
    }
}
