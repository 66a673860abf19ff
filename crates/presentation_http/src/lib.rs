//! TripFare HTTP presentation layer
//!
//! JSON API over the trip services: stateful sessions driven by
//! [`application::TripEvent`]s, plus stateless route and fare endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod sessions;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use routes::{create_app, create_router};
pub use sessions::SessionRegistry;
pub use state::AppState;
