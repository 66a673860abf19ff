//! Road routing integration for TripFare
//!
//! Provides driving, walking and cycling routes via the
//! [OSRM HTTP API](https://project-osrm.org/docs/v5.24.0/api/).
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface, implemented by [`OsrmClient`].
//! Responses are normalized to [`domain::RouteResult`]: longitude-first
//! geometry is swapped to latitude-first points, metres become kilometres
//! and seconds become minutes. Identical requests within the cache TTL are
//! served without a network call.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{GeoPoint, RouteProfile};
//! use integration_routing::{OsrmClient, RoutingClient, RoutingConfig};
//!
//! let client = OsrmClient::new(&RoutingConfig::default())?;
//! let route = client
//!     .route(RouteProfile::Driving, GeoPoint::times_square(), GeoPoint::central_park_south())
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{OsrmClient, RoutingClient};
pub use config::RoutingConfig;
pub use error::RoutingError;
