//! Trip session handlers
//!
//! A session holds one trip being edited. Events posted to it are the same
//! [`TripEvent`] values the CLI session produces.

use application::{SuggestionBook, TripEvent, TurnOutcome};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use domain::{Suggestion, TripField, TripState};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{error::ApiError, sessions::SessionHandle, state::AppState};

/// Current suggestion lists of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionLists {
    pub pickup: Vec<Suggestion>,
    pub dropoff: Vec<Suggestion>,
}

impl From<&SuggestionBook> for SuggestionLists {
    fn from(book: &SuggestionBook) -> Self {
        Self {
            pickup: book.field(TripField::Pickup).suggestions().to_vec(),
            dropoff: book.field(TripField::Dropoff).suggestions().to_vec(),
        }
    }
}

/// Text currently in each address field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTexts {
    pub pickup: String,
    pub dropoff: String,
}

impl From<&SuggestionBook> for QueryTexts {
    fn from(book: &SuggestionBook) -> Self {
        Self {
            pickup: book.field(TripField::Pickup).query().to_string(),
            dropoff: book.field(TripField::Dropoff).query().to_string(),
        }
    }
}

/// Session snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub state: TripState,
    pub queries: QueryTexts,
    pub suggestions: SuggestionLists,
}

async fn snapshot(id: Uuid, handle: &SessionHandle) -> SessionResponse {
    let session = handle.lock().await;
    SessionResponse {
        id,
        state: session.state().clone(),
        queries: session.suggestions().into(),
        suggestions: session.suggestions().into(),
    }
}

async fn lookup(state: &AppState, id: &Uuid) -> Result<SessionHandle, ApiError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {id}")))
}

/// Start a session with default pickup and dropoff
#[instrument(skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let (id, handle) = state
        .sessions
        .create()
        .await
        .ok_or_else(|| ApiError::ServiceUnavailable("Too many active sessions".to_string()))?;

    Ok((StatusCode::CREATED, Json(snapshot(id, &handle).await)))
}

/// Current state of a session
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = lookup(&state, &id).await?;
    Ok(Json(snapshot(id, &handle).await))
}

/// End a session
#[instrument(skip(state))]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {id}")))
    }
}

/// Apply one event to a session
///
/// Validation problems come back inside the outcome as a render directive,
/// not as an HTTP error, so clients handle every turn the same way.
#[instrument(skip(state, event))]
pub async fn post_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<TripEvent>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let handle = lookup(&state, &id).await?;
    let mut session = handle.lock().await;
    debug!(?event, "Handling session event");
    Ok(Json(session.handle(event).await))
}
