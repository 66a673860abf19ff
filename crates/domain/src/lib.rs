//! Domain layer for TripFare
//!
//! Contains trip state, click resolution, the local fare heuristic, route
//! and fare records, and trip validation. No I/O happens here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
