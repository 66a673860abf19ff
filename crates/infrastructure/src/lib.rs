//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports over the geocoding, routing and fare
//! integration crates, loads [`AppConfig`], initializes logging, and wires
//! everything into shared [`application::TripServices`].

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::build_trip_services;
pub use config::{
    AppConfig, FareAppConfig, GeocodingAppConfig, LogFormat, LoggingConfig, RoutingAppConfig,
    ServerConfig, SessionsConfig, SuggestionsAppConfig,
};
pub use telemetry::{LoggingError, init_logging};
