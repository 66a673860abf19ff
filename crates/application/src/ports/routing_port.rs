//! Routing port

use async_trait::async_trait;
use domain::{GeoPoint, RouteProfile, RouteResult};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Routing failures the caller falls back from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Routing backend answered 429
    #[error("Routing service rate limited")]
    RateLimited { retry_after_secs: Option<u64> },

    /// 2xx response without a usable route
    #[error("Malformed routing response: {0}")]
    MalformedResponse(String),

    /// Connection failure, timeout or non-2xx status
    #[error("Routing service unreachable: {0}")]
    Transport(String),
}

/// Port for road routing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Route between two validated points
    async fn route(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> Result<RouteResult, RouteError>;
}
