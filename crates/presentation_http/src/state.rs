//! Application state shared across handlers

use std::sync::Arc;

use application::TripServices;
use infrastructure::AppConfig;

use crate::sessions::SessionRegistry;

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    /// Stateless trip services (routing, fares, lookups)
    pub services: Arc<TripServices>,
    /// Live trip sessions
    pub sessions: SessionRegistry,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build state around already-wired services
    #[must_use]
    pub fn new(services: Arc<TripServices>, config: AppConfig) -> Self {
        let sessions = SessionRegistry::new(Arc::clone(&services), &config.sessions);
        Self {
            services,
            sessions,
            config: Arc::new(config),
        }
    }
}
