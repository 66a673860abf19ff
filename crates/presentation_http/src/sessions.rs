//! In-memory session registry
//!
//! Sessions are keyed by UUID and expire after a period without access.
//! Each session sits behind its own async mutex, so events for one session
//! are applied one at a time while other sessions proceed.

use std::{sync::Arc, time::Duration};

use application::{TripServices, TripSession};
use infrastructure::SessionsConfig;
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<TripSession>>;

/// Registry of live trip sessions
#[derive(Clone)]
pub struct SessionRegistry {
    services: Arc<TripServices>,
    sessions: Cache<Uuid, SessionHandle>,
    max_sessions: u64,
    /// Held across the capacity check and insert in `create`
    admission: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("entries", &self.sessions.entry_count())
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

impl SessionRegistry {
    /// Create a registry whose sessions share `services`
    #[must_use]
    pub fn new(services: Arc<TripServices>, config: &SessionsConfig) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(Duration::from_secs(config.idle_timeout_secs))
            .eviction_listener(|id, _, cause| {
                debug!(session_id = %id, ?cause, "Session evicted");
            })
            .build();

        Self {
            services,
            sessions,
            max_sessions: config.max_sessions,
            admission: Arc::new(Mutex::new(())),
        }
    }

    /// Start a new session with default trip state
    ///
    /// Returns `None` when the registry is full. Concurrent calls are
    /// admitted one at a time.
    pub async fn create(&self) -> Option<(Uuid, SessionHandle)> {
        let _admission = self.admission.lock().await;
        self.sessions.run_pending_tasks().await;
        if self.sessions.entry_count() >= self.max_sessions {
            return None;
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(TripSession::new(Arc::clone(&self.services))));
        self.sessions.insert(id, Arc::clone(&session)).await;
        info!(session_id = %id, "Session created");
        Some((id, session))
    }

    /// Look up a session, refreshing its idle timer
    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        self.sessions.get(id).await
    }

    /// Drop a session; `false` if it did not exist
    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).await.is_some();
        if removed {
            info!(session_id = %id, "Session deleted");
        }
        removed
    }

    /// Number of live sessions
    pub async fn count(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }

    /// Services shared by every session
    #[must_use]
    pub fn services(&self) -> &Arc<TripServices> {
        &self.services
    }
}
