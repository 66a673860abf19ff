//! Route service
//!
//! Resolves a road route through the routing port and falls back to a
//! straight-line estimate on any routing failure.

use std::{fmt, sync::Arc};

use domain::{FallbackDistance, GeoPoint, RouteProfile, RouteResult};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::Notice;
use crate::ports::{RouteError, RoutingPort};

/// A route plus the warning explaining a fallback, if one happened
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutcome {
    pub route: RouteResult,
    pub notice: Option<Notice>,
}

/// Service resolving trip routes
pub struct RouteService {
    routing: Arc<dyn RoutingPort>,
    profile: RouteProfile,
    fallback: FallbackDistance,
}

impl fmt::Debug for RouteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteService")
            .field("profile", &self.profile)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl RouteService {
    /// Create a new route service
    pub fn new(
        routing: Arc<dyn RoutingPort>,
        profile: RouteProfile,
        fallback: FallbackDistance,
    ) -> Self {
        Self {
            routing,
            profile,
            fallback,
        }
    }

    #[must_use]
    pub const fn profile(&self) -> RouteProfile {
        self.profile
    }

    /// Route with the configured profile
    pub async fn resolve(&self, from: GeoPoint, to: GeoPoint) -> RouteOutcome {
        self.resolve_with(self.profile, from, to).await
    }

    /// Route with an explicit profile
    ///
    /// Never fails: routing errors yield a straight-line route and a
    /// warning notice.
    #[instrument(skip(self))]
    pub async fn resolve_with(
        &self,
        profile: RouteProfile,
        from: GeoPoint,
        to: GeoPoint,
    ) -> RouteOutcome {
        match self.routing.route(profile, from, to).await {
            Ok(route) => {
                info!(
                    distance_km = route.distance_km,
                    duration_min = route.duration_min,
                    "Route resolved"
                );
                RouteOutcome { route, notice: None }
            },
            Err(err) => {
                warn!(error = %err, "Routing failed, using straight-line estimate");
                RouteOutcome {
                    route: RouteResult::straight_line(from, to, self.fallback),
                    notice: Some(Notice::warning(fallback_message(&err))),
                }
            },
        }
    }
}

fn fallback_message(err: &RouteError) -> String {
    let reason = match err {
        RouteError::RateLimited {
            retry_after_secs: Some(secs),
        } => format!("routing service rate limited (retry after {secs}s)"),
        RouteError::RateLimited { .. } => "routing service rate limited".to_string(),
        RouteError::MalformedResponse(detail) => format!("unusable routing response ({detail})"),
        RouteError::Transport(detail) => format!("routing service unreachable ({detail})"),
    };
    format!("Route unavailable: {reason}. Showing a straight-line estimate.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockRoutingPort;
    use crate::services::NoticeLevel;
    use domain::RouteSource;

    fn pickup() -> GeoPoint {
        GeoPoint::times_square()
    }

    fn dropoff() -> GeoPoint {
        GeoPoint::central_park_south()
    }

    fn routed() -> RouteResult {
        RouteResult {
            distance_km: 1.9,
            duration_min: 6.5,
            path: vec![pickup(), GeoPoint::new_unchecked(40.762, -73.983), dropoff()],
            source: RouteSource::Routed,
        }
    }

    #[tokio::test]
    async fn test_routed_result_passes_through() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route()
            .withf(|profile, _, _| *profile == RouteProfile::Driving)
            .times(1)
            .returning(|_, _, _| Ok(routed()));
        let service =
            RouteService::new(Arc::new(mock), RouteProfile::Driving, FallbackDistance::default());

        let outcome = service.resolve(pickup(), dropoff()).await;

        assert_eq!(outcome.route, routed());
        assert!(outcome.notice.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_falls_back_to_straight_line() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route().returning(|_, _, _| {
            Err(RouteError::RateLimited {
                retry_after_secs: Some(10),
            })
        });
        let service = RouteService::new(
            Arc::new(mock),
            RouteProfile::Driving,
            FallbackDistance::DegreeApprox,
        );

        let outcome = service.resolve(pickup(), dropoff()).await;

        assert_eq!(outcome.route.source, RouteSource::StraightLine);
        assert_eq!(outcome.route.path, vec![pickup(), dropoff()]);
        let expected_km = pickup().degree_distance(&dropoff()) * 111.0;
        assert!((outcome.route.distance_km - expected_km).abs() < 1e-9);
        assert!((outcome.route.duration_min - expected_km / (22.0 / 60.0)).abs() < 1e-9);

        let notice = outcome.notice.unwrap();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("retry after 10s"));
    }

    #[tokio::test]
    async fn test_haversine_fallback() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route()
            .returning(|_, _, _| Err(RouteError::Transport("timed out".to_string())));
        let service =
            RouteService::new(Arc::new(mock), RouteProfile::Driving, FallbackDistance::Haversine);

        let outcome = service.resolve(pickup(), dropoff()).await;

        let expected_km = pickup().haversine_km(&dropoff());
        assert!((outcome.route.distance_km - expected_km).abs() < 1e-9);
        assert!(outcome.notice.unwrap().message.contains("unreachable"));
    }

    #[tokio::test]
    async fn test_explicit_profile_used() {
        let mut mock = MockRoutingPort::new();
        mock.expect_route()
            .withf(|profile, _, _| *profile == RouteProfile::Cycling)
            .times(1)
            .returning(|_, _, _| Ok(routed()));
        let service =
            RouteService::new(Arc::new(mock), RouteProfile::Driving, FallbackDistance::default());

        let outcome = service
            .resolve_with(RouteProfile::Cycling, pickup(), dropoff())
            .await;
        assert!(outcome.route.is_routed());
    }

    #[test]
    fn test_malformed_message() {
        let message = fallback_message(&RouteError::MalformedResponse("NoRoute".to_string()));
        assert_eq!(
            message,
            "Route unavailable: unusable routing response (NoRoute). Showing a straight-line estimate."
        );
    }
}
