#![forbid(unsafe_code)]
//! Geocoding integration for TripFare
//!
//! Provides place suggestions via [Mapbox Geocoding v6](https://docs.mapbox.com/api/search/geocoding/)
//! with [LocationIQ](https://locationiq.com) as fallback, plus one-shot search via
//! [Nominatim](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! Every backend implements [`GeocodingProvider`] and normalizes its own
//! response schema into [`domain::Suggestion`]. [`ProviderChain`] holds the
//! providers in preference order and dispatches to the first configured one.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::SearchBias;
//! use integration_geocoding::{GeocodingConfig, LookupMode, ProviderChain};
//!
//! let chain = ProviderChain::from_config(&GeocodingConfig::default())?;
//! if let Some(lookup) = chain.lookup("times sq", &SearchBias::default(), LookupMode::Autocomplete).await {
//!     println!("{}: {:?}", lookup.provider, lookup.result);
//! }
//! ```

mod chain;
mod config;
mod error;
mod http;
mod locationiq;
mod mapbox;
mod nominatim;
mod provider;

pub use chain::{ProviderChain, ProviderLookup};
pub use config::GeocodingConfig;
pub use error::GeocodingError;
pub use locationiq::LocationIqClient;
pub use mapbox::MapboxGeocodingClient;
pub use nominatim::NominatimSearchClient;
pub use provider::{GeocodingProvider, LookupMode};
