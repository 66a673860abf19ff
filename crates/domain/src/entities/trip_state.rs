//! Trip state entity and nearest-marker click resolution

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoPoint, Suggestion, TripField};

/// Two clicks closer than this in both coordinates are the same click
pub const CLICK_EPSILON: f64 = 1e-10;

/// Default pickup label
pub const DEFAULT_PICKUP_LABEL: &str = "Times Square, New York, NY";

/// Default dropoff label
pub const DEFAULT_DROPOFF_LABEL: &str = "Central Park South, New York, NY";

/// Outcome of feeding a map click into [`TripState::resolve_click`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "field", rename_all = "snake_case")]
pub enum ClickResolution {
    /// The click moved the given endpoint
    Assigned(TripField),
    /// The click repeats the last processed click and was ignored
    Duplicate,
    /// The click carried a NaN or infinite coordinate and was ignored
    NotFinite,
}

/// Mutable per-session trip record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripState {
    pickup: GeoPoint,
    dropoff: GeoPoint,
    pickup_label: String,
    dropoff_label: String,
    last_click: Option<GeoPoint>,
}

impl Default for TripState {
    fn default() -> Self {
        Self {
            pickup: GeoPoint::times_square(),
            dropoff: GeoPoint::central_park_south(),
            pickup_label: DEFAULT_PICKUP_LABEL.to_string(),
            dropoff_label: DEFAULT_DROPOFF_LABEL.to_string(),
            last_click: None,
        }
    }
}

impl TripState {
    /// Create a trip state with the New York defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pickup point
    #[must_use]
    pub const fn pickup(&self) -> GeoPoint {
        self.pickup
    }

    /// Dropoff point
    #[must_use]
    pub const fn dropoff(&self) -> GeoPoint {
        self.dropoff
    }

    /// Point for a field
    #[must_use]
    pub const fn point(&self, field: TripField) -> GeoPoint {
        match field {
            TripField::Pickup => self.pickup,
            TripField::Dropoff => self.dropoff,
        }
    }

    /// Address label for a field
    #[must_use]
    pub fn label(&self, field: TripField) -> &str {
        match field {
            TripField::Pickup => &self.pickup_label,
            TripField::Dropoff => &self.dropoff_label,
        }
    }

    /// Last processed click, if any
    #[must_use]
    pub const fn last_click(&self) -> Option<GeoPoint> {
        self.last_click
    }

    /// Replace a field's point and label
    pub fn set_endpoint(&mut self, field: TripField, point: GeoPoint, label: impl Into<String>) {
        let label = label.into();
        match field {
            TripField::Pickup => {
                self.pickup = point;
                self.pickup_label = label;
            },
            TripField::Dropoff => {
                self.dropoff = point;
                self.dropoff_label = label;
            },
        }
    }

    /// Move a field to a numerically entered point, labelled with its coordinates
    pub fn set_coordinates(&mut self, field: TripField, point: GeoPoint) {
        self.set_endpoint(field, point, point.coordinate_label());
    }

    /// Apply a chosen autocomplete suggestion to a field
    pub fn apply_suggestion(&mut self, field: TripField, suggestion: &Suggestion) {
        self.set_endpoint(field, suggestion.point(), suggestion.label.clone());
    }

    /// Which endpoint a click would move, ignoring de-duplication
    ///
    /// Ties go to pickup.
    #[must_use]
    pub fn nearest_field(&self, click: &GeoPoint) -> TripField {
        let d_pickup = click.degree_distance(&self.pickup);
        let d_dropoff = click.degree_distance(&self.dropoff);
        if d_pickup <= d_dropoff {
            TripField::Pickup
        } else {
            TripField::Dropoff
        }
    }

    /// Move the nearer endpoint to a map click
    ///
    /// A click within [`CLICK_EPSILON`] of the previous processed click is
    /// ignored so repeated delivery of the same UI event mutates nothing.
    /// Non-finite clicks are rejected and never become the last click.
    pub fn resolve_click(&mut self, click: GeoPoint) -> ClickResolution {
        if !click.is_finite() {
            return ClickResolution::NotFinite;
        }

        if let Some(last) = self.last_click
            && !click.differs_from(&last, CLICK_EPSILON)
        {
            return ClickResolution::Duplicate;
        }

        self.last_click = Some(click);
        let field = self.nearest_field(&click);
        self.set_coordinates(field, click);
        ClickResolution::Assigned(field)
    }

    /// Restore the defaults and forget the last click
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
