//! Suggestion service
//!
//! Applies the minimum query length and per-field throttle on top of the
//! geocoding port, and turns every lookup failure into an empty list plus a
//! notice.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use domain::{DEFAULT_DROPOFF_LABEL, DEFAULT_PICKUP_LABEL, SearchBias, Suggestion, TripField};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::Notice;
use crate::ports::{GeocodingPort, LookupError, ProviderSuggestions};

/// Thresholds applied before a query reaches a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionSettings {
    /// Shortest trimmed query, in characters, that is dispatched
    pub min_query_len: usize,
    /// Minimum gap between two dispatched autocomplete calls for one field
    pub cooldown: Duration,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            cooldown: Duration::from_millis(600),
        }
    }
}

/// Query text, last list and last dispatch time for one field
#[derive(Debug, Clone, Default)]
pub struct FieldSuggestions {
    query: String,
    suggestions: Vec<Suggestion>,
    last_dispatch: Option<Instant>,
}

impl FieldSuggestions {
    /// Most recent query text typed into the field
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Most recent suggestion list
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }
}

/// Suggestion state for both trip fields, owned by one session
///
/// Query texts start out as the default trip labels.
#[derive(Debug, Clone)]
pub struct SuggestionBook {
    pickup: FieldSuggestions,
    dropoff: FieldSuggestions,
}

impl Default for SuggestionBook {
    fn default() -> Self {
        Self {
            pickup: FieldSuggestions {
                query: DEFAULT_PICKUP_LABEL.to_string(),
                ..FieldSuggestions::default()
            },
            dropoff: FieldSuggestions {
                query: DEFAULT_DROPOFF_LABEL.to_string(),
                ..FieldSuggestions::default()
            },
        }
    }
}

impl SuggestionBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a field's query text without dispatching it
    pub fn set_query(&mut self, field: TripField, text: impl Into<String>) {
        self.field_mut(field).query = text.into();
    }

    #[must_use]
    pub const fn field(&self, field: TripField) -> &FieldSuggestions {
        match field {
            TripField::Pickup => &self.pickup,
            TripField::Dropoff => &self.dropoff,
        }
    }

    fn field_mut(&mut self, field: TripField) -> &mut FieldSuggestions {
        match field {
            TripField::Pickup => &mut self.pickup,
            TripField::Dropoff => &mut self.dropoff,
        }
    }

    /// Suggestion at `index` for a field
    #[must_use]
    pub fn get(&self, field: TripField, index: usize) -> Option<&Suggestion> {
        self.field(field).suggestions.get(index)
    }

    /// Forget lists and throttle timestamps, restoring the default queries
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What happened to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestStatus {
    /// Sent to a provider
    Dispatched,
    /// Too short to send; previous list kept
    BelowThreshold,
    /// Inside the cooldown window; previous list returned
    Throttled,
}

/// Result of a suggestion request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestOutcome {
    pub status: SuggestStatus,
    /// Provider that answered, when one did
    pub provider: Option<String>,
    pub suggestions: Vec<Suggestion>,
    pub notices: Vec<Notice>,
}

/// Service producing address suggestions for trip fields
pub struct SuggestionService {
    geocoding: Arc<dyn GeocodingPort>,
    bias: SearchBias,
    settings: SuggestionSettings,
}

impl fmt::Debug for SuggestionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuggestionService")
            .field("bias", &self.bias)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SuggestionService {
    /// Create a new suggestion service
    pub fn new(
        geocoding: Arc<dyn GeocodingPort>,
        bias: SearchBias,
        settings: SuggestionSettings,
    ) -> Self {
        Self {
            geocoding,
            bias,
            settings,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> SuggestionSettings {
        self.settings
    }

    #[must_use]
    pub const fn bias(&self) -> &SearchBias {
        &self.bias
    }

    /// Configured provider names in preference order
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.geocoding.provider_names()
    }

    /// Autocomplete for a field as the user types
    ///
    /// Short queries are not dispatched and keep the previous list. A query
    /// arriving within the cooldown of the last dispatched one for the same
    /// field returns the previous list unchanged.
    #[instrument(skip(self, book, now))]
    pub async fn suggest(
        &self,
        book: &mut SuggestionBook,
        field: TripField,
        query: &str,
        now: Instant,
    ) -> SuggestOutcome {
        let entry = book.field_mut(field);
        entry.query = query.to_string();

        if query.trim().chars().count() < self.settings.min_query_len {
            debug!("Query below threshold, not dispatched");
            return SuggestOutcome {
                status: SuggestStatus::BelowThreshold,
                provider: None,
                suggestions: entry.suggestions.clone(),
                notices: Vec::new(),
            };
        }

        if let Some(last) = entry.last_dispatch
            && now.saturating_duration_since(last) < self.settings.cooldown
        {
            debug!("Query throttled, returning previous suggestions");
            return SuggestOutcome {
                status: SuggestStatus::Throttled,
                provider: None,
                suggestions: entry.suggestions.clone(),
                notices: Vec::new(),
            };
        }

        entry.last_dispatch = Some(now);
        let result = self.geocoding.autocomplete(query.trim(), &self.bias).await;
        Self::store(entry, result, "Autocomplete")
    }

    /// One-shot search for a field, never throttled
    ///
    /// Empty queries are not dispatched.
    #[instrument(skip(self, book))]
    pub async fn search(
        &self,
        book: &mut SuggestionBook,
        field: TripField,
        query: &str,
    ) -> SuggestOutcome {
        let entry = book.field_mut(field);
        entry.query = query.to_string();

        if query.trim().is_empty() {
            return SuggestOutcome {
                status: SuggestStatus::BelowThreshold,
                provider: None,
                suggestions: entry.suggestions.clone(),
                notices: Vec::new(),
            };
        }

        let result = self.geocoding.search(query.trim(), &self.bias).await;
        Self::store(entry, result, "Search")
    }

    fn store(
        entry: &mut FieldSuggestions,
        result: Result<ProviderSuggestions, LookupError>,
        action: &str,
    ) -> SuggestOutcome {
        match result {
            Ok(found) => {
                debug!(
                    provider = %found.provider,
                    count = found.suggestions.len(),
                    "Suggestions received"
                );
                entry.suggestions.clone_from(&found.suggestions);
                SuggestOutcome {
                    status: SuggestStatus::Dispatched,
                    provider: Some(found.provider),
                    suggestions: found.suggestions,
                    notices: Vec::new(),
                }
            },
            Err(LookupError::NotConfigured) => {
                entry.suggestions.clear();
                SuggestOutcome {
                    status: SuggestStatus::Dispatched,
                    provider: None,
                    suggestions: Vec::new(),
                    notices: vec![Notice::info(format!(
                        "{action} unavailable: no geocoding provider is configured \
                         (set MAPBOX_ACCESS_TOKEN or LOCATIONIQ_TOKEN)."
                    ))],
                }
            },
            Err(err) => {
                warn!(error = %err, "Geocoding lookup failed");
                entry.suggestions.clear();
                let provider = err.provider().map(ToString::to_string);
                let message = match &provider {
                    Some(name) => format!("{action} error ({name}): {}", describe(&err)),
                    None => format!("{action} error: {err}"),
                };
                SuggestOutcome {
                    status: SuggestStatus::Dispatched,
                    provider,
                    suggestions: Vec::new(),
                    notices: vec![Notice::warning(message)],
                }
            },
        }
    }
}

fn describe(err: &LookupError) -> String {
    match err {
        LookupError::NotConfigured => "not configured".to_string(),
        LookupError::RateLimited { .. } => "rate limited".to_string(),
        LookupError::MalformedResponse { message, .. } => format!("malformed response: {message}"),
        LookupError::Transport { message, .. } => message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockGeocodingPort;
    use crate::services::NoticeLevel;

    fn found(provider: &str, labels: &[&str]) -> ProviderSuggestions {
        ProviderSuggestions {
            provider: provider.to_string(),
            suggestions: labels
                .iter()
                .map(|l| Suggestion::new(*l, 40.75, -73.98))
                .collect(),
        }
    }

    fn service(mock: MockGeocodingPort) -> SuggestionService {
        SuggestionService::new(
            Arc::new(mock),
            SearchBias::default(),
            SuggestionSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_short_query_not_dispatched() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete().never();
        let service = service(mock);
        let mut book = SuggestionBook::new();

        let outcome = service
            .suggest(&mut book, TripField::Pickup, " ab ", Instant::now())
            .await;

        assert_eq!(outcome.status, SuggestStatus::BelowThreshold);
        assert!(outcome.suggestions.is_empty());
        assert!(outcome.notices.is_empty());
        assert_eq!(book.field(TripField::Pickup).query(), " ab ");
    }

    #[tokio::test]
    async fn test_short_query_keeps_previous_list() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .times(1)
            .returning(|_, _| Ok(found("Mapbox", &["Broadway", "Broad St"])));
        let service = service(mock);
        let mut book = SuggestionBook::new();
        let t0 = Instant::now();

        service.suggest(&mut book, TripField::Pickup, "broa", t0).await;
        let outcome = service
            .suggest(&mut book, TripField::Pickup, "br", t0 + Duration::from_secs(5))
            .await;

        assert_eq!(outcome.status, SuggestStatus::BelowThreshold);
        assert_eq!(outcome.suggestions.len(), 2);
    }

    #[tokio::test]
    async fn test_throttle_returns_stale_list() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .times(1)
            .returning(|_, _| Ok(found("Mapbox", &["Penn Station"])));
        let service = service(mock);
        let mut book = SuggestionBook::new();
        let t0 = Instant::now();

        let first = service.suggest(&mut book, TripField::Dropoff, "pen", t0).await;
        let second = service
            .suggest(&mut book, TripField::Dropoff, "penn", t0 + Duration::from_millis(200))
            .await;

        assert_eq!(first.status, SuggestStatus::Dispatched);
        assert_eq!(second.status, SuggestStatus::Throttled);
        assert_eq!(second.suggestions, first.suggestions);
        assert_eq!(book.field(TripField::Dropoff).query(), "penn");
    }

    #[tokio::test]
    async fn test_throttle_is_per_field() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .times(2)
            .returning(|q, _| Ok(found("Mapbox", &[q])));
        let service = service(mock);
        let mut book = SuggestionBook::new();
        let t0 = Instant::now();

        service.suggest(&mut book, TripField::Pickup, "soho", t0).await;
        let outcome = service
            .suggest(&mut book, TripField::Dropoff, "tribeca", t0 + Duration::from_millis(10))
            .await;

        assert_eq!(outcome.status, SuggestStatus::Dispatched);
        assert_eq!(outcome.suggestions[0].label, "tribeca");
    }

    #[tokio::test]
    async fn test_dispatch_again_after_cooldown() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .times(2)
            .returning(|_, _| Ok(found("LocationIQ", &["Wall St"])));
        let service = service(mock);
        let mut book = SuggestionBook::new();
        let t0 = Instant::now();

        service.suggest(&mut book, TripField::Pickup, "wall", t0).await;
        let outcome = service
            .suggest(&mut book, TripField::Pickup, "wall s", t0 + Duration::from_millis(600))
            .await;

        assert_eq!(outcome.status, SuggestStatus::Dispatched);
        assert_eq!(outcome.provider.as_deref(), Some("LocationIQ"));
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_dispatch() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .withf(|q, _| q == "times sq")
            .times(1)
            .returning(|_, _| Ok(found("Mapbox", &[])));
        let service = service(mock);
        let mut book = SuggestionBook::new();

        service
            .suggest(&mut book, TripField::Pickup, "  times sq ", Instant::now())
            .await;
    }

    #[tokio::test]
    async fn test_not_configured_is_info_notice() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete()
            .returning(|_, _| Err(LookupError::NotConfigured));
        let service = service(mock);
        let mut book = SuggestionBook::new();

        let outcome = service
            .suggest(&mut book, TripField::Pickup, "union sq", Instant::now())
            .await;

        assert!(outcome.suggestions.is_empty());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn test_failure_names_provider() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_autocomplete().returning(|_, _| {
            Err(LookupError::RateLimited {
                provider: "Mapbox".to_string(),
            })
        });
        let service = service(mock);
        let mut book = SuggestionBook::new();

        let outcome = service
            .suggest(&mut book, TripField::Pickup, "chelsea", Instant::now())
            .await;

        assert!(outcome.suggestions.is_empty());
        assert_eq!(outcome.notices[0].level, NoticeLevel::Warning);
        assert_eq!(
            outcome.notices[0].message,
            "Autocomplete error (Mapbox): rate limited"
        );
    }

    #[tokio::test]
    async fn test_failure_clears_previous_list() {
        let mut mock = MockGeocodingPort::new();
        let mut calls = 0;
        mock.expect_autocomplete().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(found("Mapbox", &["Harlem"]))
            } else {
                Err(LookupError::Transport {
                    provider: "Mapbox".to_string(),
                    message: "HTTP 502".to_string(),
                })
            }
        });
        let service = service(mock);
        let mut book = SuggestionBook::new();
        let t0 = Instant::now();

        service.suggest(&mut book, TripField::Pickup, "harl", t0).await;
        let outcome = service
            .suggest(&mut book, TripField::Pickup, "harle", t0 + Duration::from_secs(1))
            .await;

        assert!(outcome.suggestions.is_empty());
        assert!(book.field(TripField::Pickup).suggestions().is_empty());
        assert!(outcome.notices[0].message.contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_search_ignores_throttle() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search()
            .times(2)
            .returning(|_, _| Ok(found("Nominatim", &["Grand Central Terminal"])));
        let service = service(mock);
        let mut book = SuggestionBook::new();

        service.search(&mut book, TripField::Dropoff, "grand central").await;
        let outcome = service
            .search(&mut book, TripField::Dropoff, "grand central")
            .await;

        assert_eq!(outcome.status, SuggestStatus::Dispatched);
        assert_eq!(
            book.get(TripField::Dropoff, 0).map(|s| s.label.as_str()),
            Some("Grand Central Terminal")
        );
    }

    #[tokio::test]
    async fn test_search_empty_query_not_dispatched() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search().never();
        let service = service(mock);
        let mut book = SuggestionBook::new();

        let outcome = service.search(&mut book, TripField::Pickup, "   ").await;
        assert_eq!(outcome.status, SuggestStatus::BelowThreshold);
    }

    #[test]
    fn test_book_clear() {
        let mut book = SuggestionBook::new();
        book.field_mut(TripField::Pickup).query = "x".to_string();
        book.field_mut(TripField::Pickup)
            .suggestions
            .push(Suggestion::new("x", 1.0, 2.0));
        book.clear();
        assert!(book.get(TripField::Pickup, 0).is_none());
        assert_eq!(book.field(TripField::Pickup).query(), DEFAULT_PICKUP_LABEL);
    }

    #[test]
    fn test_book_starts_with_default_labels() {
        let mut book = SuggestionBook::new();
        assert_eq!(book.field(TripField::Pickup).query(), DEFAULT_PICKUP_LABEL);
        assert_eq!(book.field(TripField::Dropoff).query(), DEFAULT_DROPOFF_LABEL);

        book.set_query(TripField::Dropoff, "40.767500, -73.981800");
        assert_eq!(book.field(TripField::Dropoff).query(), "40.767500, -73.981800");
        assert!(book.get(TripField::Dropoff, 0).is_none());
    }
}
