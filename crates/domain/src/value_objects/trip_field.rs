//! Trip endpoint selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two tracked trip endpoints an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripField {
    /// Trip start
    Pickup,
    /// Trip end
    Dropoff,
}

impl TripField {
    /// Both fields in display order
    pub const ALL: [Self; 2] = [Self::Pickup, Self::Dropoff];

    /// Capitalized label used in user-facing messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pickup => "Pickup",
            Self::Dropoff => "Dropoff",
        }
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Dropoff => write!(f, "dropoff"),
        }
    }
}

impl std::str::FromStr for TripField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pickup" | "from" => Ok(Self::Pickup),
            "dropoff" | "to" => Ok(Self::Dropoff),
            _ => Err(format!("Invalid field: {s}. Use 'pickup' or 'dropoff'")),
        }
    }
}
