//! Port definitions for the application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod fare_port;
mod geocoding_port;
mod routing_port;

#[cfg(test)]
pub use fare_port::MockFarePort;
pub use fare_port::{FareError, FarePort, RemoteFare};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::{GeocodingPort, LookupError, ProviderSuggestions};
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::{RouteError, RoutingPort};
