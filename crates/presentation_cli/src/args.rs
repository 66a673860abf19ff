//! Argument value parsers shared by subcommands and the session prompt

use chrono::NaiveDateTime;
use domain::{GeoPoint, PICKUP_DATETIME_FORMAT};

/// Accepted pickup time layouts, most specific first
const DATETIME_FORMATS: [&str; 3] = [PICKUP_DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse `LAT,LNG` into a validated point
pub fn parse_point(value: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("Expected LAT,LNG but got '{value}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("Invalid latitude '{}'", lat.trim()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("Invalid longitude '{}'", lng.trim()))?;
    GeoPoint::new(lat, lng).map_err(|e| e.to_string())
}

/// Parse a local pickup time
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("Invalid pickup time '{value}'. Use YYYY-MM-DD HH:MM:SS"))
}
