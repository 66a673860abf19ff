//! Application services - Use case implementations

mod fare_service;
mod notice;
mod route_service;
mod suggestion_service;
mod trip_session;

pub use fare_service::{FareExchange, FareOutcome, FareService};
pub use notice::{Notice, NoticeLevel};
pub use route_service::{RouteOutcome, RouteService};
pub use suggestion_service::{
    FieldSuggestions, SuggestOutcome, SuggestStatus, SuggestionBook, SuggestionService,
    SuggestionSettings,
};
pub use trip_session::{
    RenderDirective, TripEvent, TripReport, TripServices, TripSession, TurnOutcome,
};
