//! Infrastructure adapters
//!
//! Adapters connect application ports to the integration clients.

mod fare_adapter;
mod geocoding_adapter;
mod routing_adapter;

pub use fare_adapter::FarePredictorAdapter;
pub use geocoding_adapter::GeocodingAdapter;
pub use routing_adapter::RoutingAdapter;
