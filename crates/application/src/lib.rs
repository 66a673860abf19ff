//! Application layer for TripFare
//!
//! Ports describe what the trip flow needs from the outside world
//! (geocoding, routing, fare prediction). Services hold the rules that sit
//! on top of those ports: suggestion throttling, route fallback, fare
//! fallback, and the per-session event handler that ties them together.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
