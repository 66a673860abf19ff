//! Domain entities - Trip state and the records derived from it

mod fare;
mod route;
mod trip_request;
mod trip_state;

pub use fare::{
    BASE_FARE, EXTRA_PASSENGER_FEE, FarePayload, FareQuote, PER_KM_RATE, PICKUP_DATETIME_FORMAT,
    local_fare_estimate,
};
pub use route::{FALLBACK_SPEED_KMH, FallbackDistance, RouteProfile, RouteResult, RouteSource};
pub use trip_request::{TripRequest, ValidationIssue, validate_trip};
pub use trip_state::{
    CLICK_EPSILON, ClickResolution, DEFAULT_DROPOFF_LABEL, DEFAULT_PICKUP_LABEL, TripState,
};
