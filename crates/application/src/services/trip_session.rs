//! Trip session event handler
//!
//! A [`TripSession`] owns one trip's state and suggestion lists. Callers feed
//! it [`TripEvent`]s one at a time and get back a [`TurnOutcome`] telling
//! them what to show.

use std::{sync::Arc, time::Instant};

use chrono::{Local, NaiveDateTime};
use domain::{
    ClickResolution, DomainError, FareQuote, GeoPoint, RouteResult, Suggestion, TripField,
    TripRequest, TripState,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{
    FareExchange, FareService, Notice, RouteService, SuggestStatus, SuggestionBook,
    SuggestionService,
};

/// Services shared by every session
#[derive(Debug)]
pub struct TripServices {
    pub suggestions: SuggestionService,
    pub routes: RouteService,
    pub fares: FareService,
}

const fn default_passengers() -> u32 {
    1
}

/// Input handled by a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TripEvent {
    /// Text typed into a field; throttled autocomplete
    Query { field: TripField, text: String },
    /// Explicit one-shot search for a field
    Search { field: TripField, text: String },
    /// Pick entry `index` from a field's current suggestions
    SelectSuggestion { field: TripField, index: usize },
    /// Raw map click, validated only when a trip is requested
    Click { lat: f64, lng: f64 },
    /// Coordinates typed into a field
    ManualEntry { field: TripField, lat: f64, lng: f64 },
    /// Back to the default trip
    Reset,
    /// Route and price the current trip
    RequestTrip {
        /// Local pickup time; now when omitted
        #[serde(default)]
        pickup_datetime: Option<NaiveDateTime>,
        #[serde(default = "default_passengers")]
        passengers: u32,
    },
}

/// Everything shown for a priced trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub pickup: GeoPoint,
    pub pickup_label: String,
    pub dropoff: GeoPoint,
    pub dropoff_label: String,
    pub pickup_datetime: NaiveDateTime,
    pub passengers: u32,
    pub route: RouteResult,
    pub quote: FareQuote,
    /// Predictor request and response, when the predictor was called
    pub fare_exchange: Option<FareExchange>,
}

/// What the caller should render after a turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RenderDirective {
    NoChange,
    Rerender,
    ShowSuggestions {
        field: TripField,
        suggestions: Vec<Suggestion>,
    },
    ShowTrip(Box<TripReport>),
    ShowValidationErrors(Vec<String>),
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub render: RenderDirective,
    pub notices: Vec<Notice>,
    /// Trip state after the event
    pub state: TripState,
}

/// One user's trip, processed one event at a time
#[derive(Debug)]
pub struct TripSession {
    services: Arc<TripServices>,
    state: TripState,
    book: SuggestionBook,
}

impl TripSession {
    /// Start a session with the default trip
    pub fn new(services: Arc<TripServices>) -> Self {
        Self {
            services,
            state: TripState::new(),
            book: SuggestionBook::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TripState {
        &self.state
    }

    #[must_use]
    pub const fn suggestions(&self) -> &SuggestionBook {
        &self.book
    }

    /// Handle an event at the current instant
    pub async fn handle(&mut self, event: TripEvent) -> TurnOutcome {
        self.handle_at(event, Instant::now()).await
    }

    /// Handle an event at `now`, which drives autocomplete throttling
    #[instrument(skip(self, now))]
    pub async fn handle_at(&mut self, event: TripEvent, now: Instant) -> TurnOutcome {
        let (render, notices) = match event {
            TripEvent::Query { field, text } => {
                let outcome = self
                    .services
                    .suggestions
                    .suggest(&mut self.book, field, &text, now)
                    .await;
                let render = match outcome.status {
                    SuggestStatus::BelowThreshold => RenderDirective::NoChange,
                    SuggestStatus::Dispatched | SuggestStatus::Throttled => {
                        RenderDirective::ShowSuggestions {
                            field,
                            suggestions: outcome.suggestions,
                        }
                    },
                };
                (render, outcome.notices)
            },
            TripEvent::Search { field, text } => {
                let outcome = self
                    .services
                    .suggestions
                    .search(&mut self.book, field, &text)
                    .await;
                let render = match outcome.status {
                    SuggestStatus::BelowThreshold => RenderDirective::NoChange,
                    SuggestStatus::Dispatched | SuggestStatus::Throttled => {
                        RenderDirective::ShowSuggestions {
                            field,
                            suggestions: outcome.suggestions,
                        }
                    },
                };
                (render, outcome.notices)
            },
            TripEvent::SelectSuggestion { field, index } => self.select(field, index),
            TripEvent::Click { lat, lng } => self.click(GeoPoint::new_unchecked(lat, lng)),
            TripEvent::ManualEntry { field, lat, lng } => self.manual_entry(field, lat, lng),
            TripEvent::Reset => {
                self.state.reset();
                self.book.clear();
                debug!("Session reset");
                (RenderDirective::Rerender, Vec::new())
            },
            TripEvent::RequestTrip {
                pickup_datetime,
                passengers,
            } => {
                let at = pickup_datetime.unwrap_or_else(|| Local::now().naive_local());
                self.request_trip(at, passengers).await
            },
        };

        TurnOutcome {
            render,
            notices,
            state: self.state.clone(),
        }
    }

    fn select(&mut self, field: TripField, index: usize) -> (RenderDirective, Vec<Notice>) {
        match self.book.get(field, index) {
            Some(suggestion) => {
                self.state.apply_suggestion(field, suggestion);
                (RenderDirective::Rerender, Vec::new())
            },
            None => (
                RenderDirective::NoChange,
                vec![Notice::warning(format!(
                    "{}: no suggestion #{index} to select.",
                    field.label()
                ))],
            ),
        }
    }

    fn click(&mut self, point: GeoPoint) -> (RenderDirective, Vec<Notice>) {
        match self.state.resolve_click(point) {
            ClickResolution::Assigned(field) => {
                debug!(field = %field, "Click assigned");
                self.book.set_query(field, self.state.label(field));
                (RenderDirective::Rerender, Vec::new())
            },
            ClickResolution::Duplicate => (RenderDirective::NoChange, Vec::new()),
            ClickResolution::NotFinite => (
                RenderDirective::ShowValidationErrors(vec![
                    "Click: coordinates must be finite numbers.".to_string(),
                ]),
                Vec::new(),
            ),
        }
    }

    fn manual_entry(
        &mut self,
        field: TripField,
        lat: f64,
        lng: f64,
    ) -> (RenderDirective, Vec<Notice>) {
        match GeoPoint::new(lat, lng) {
            Ok(point) => {
                self.state.set_coordinates(field, point);
                self.book.set_query(field, self.state.label(field));
                (RenderDirective::Rerender, Vec::new())
            },
            Err(_) => (
                RenderDirective::ShowValidationErrors(vec![format!(
                    "{}: coordinates out of bounds.",
                    field.label()
                )]),
                Vec::new(),
            ),
        }
    }

    async fn request_trip(
        &self,
        pickup_datetime: NaiveDateTime,
        passengers: u32,
    ) -> (RenderDirective, Vec<Notice>) {
        let request = match TripRequest::from_state(&self.state, pickup_datetime, passengers) {
            Ok(request) => request,
            Err(err @ DomainError::TripValidation(_)) => {
                debug!(error = %err, "Trip request rejected");
                return (RenderDirective::ShowValidationErrors(err.messages()), Vec::new());
            },
            Err(other) => {
                return (
                    RenderDirective::ShowValidationErrors(vec![other.to_string()]),
                    Vec::new(),
                );
            },
        };

        let mut notices = Vec::new();

        let routed = self
            .services
            .routes
            .resolve(request.pickup, request.dropoff)
            .await;
        notices.extend(routed.notice);

        let fare = self
            .services
            .fares
            .quote(&request.fare_payload(), routed.route.distance_km)
            .await;
        notices.extend(fare.notices);

        info!(
            distance_km = routed.route.distance_km,
            fare = fare.quote.display_fare(),
            routed = routed.route.is_routed(),
            "Trip priced"
        );

        let report = TripReport {
            pickup: request.pickup,
            pickup_label: self.state.label(TripField::Pickup).to_string(),
            dropoff: request.dropoff,
            dropoff_label: self.state.label(TripField::Dropoff).to_string(),
            pickup_datetime: request.pickup_datetime,
            passengers: request.passengers,
            route: routed.route,
            quote: fare.quote,
            fare_exchange: fare.exchange,
        };

        (RenderDirective::ShowTrip(Box::new(report)), notices)
    }
}
