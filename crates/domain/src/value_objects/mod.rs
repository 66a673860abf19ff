//! Value Objects - Immutable, identity-less domain primitives

mod bounding_box;
mod geo_point;
mod search_bias;
mod suggestion;
mod trip_field;

pub use bounding_box::BoundingBox;
pub use geo_point::{GeoPoint, InvalidCoordinates, KM_PER_DEGREE};
pub use search_bias::SearchBias;
pub use suggestion::Suggestion;
pub use trip_field::TripField;
