//! Per-session dashboard state.
//!
//! Every session owns its own [`Collection`]; nothing is shared between
//! sessions. Each session sits behind an async mutex that is held for a whole
//! interaction, so interactions of one session run one after another while
//! different sessions proceed independently. Sessions idle for longer than
//! the configured TTL are evicted by a periodic sweep.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::SessionInfo;
use crate::config::SessionSettings;
use crate::models::{Collection, Location};

/// Session identifier (uuid v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new_v4() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(SessionId)
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Invalid session id: {0}")]
    InvalidId(String),
}

/// One user's view lineage.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub collection: Arc<Collection>,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
}

impl Session {
    fn new(id: SessionId, location: Location, collection: Arc<Collection>) -> Self {
        let now = Utc::now();
        Self {
            id,
            collection,
            location,
            created_at: now,
            last_interaction_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_interaction_at = Utc::now();
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id,
            item_count: self.collection.len(),
            location: self.location,
            max_log_views: self.collection.max_log_views(),
            checksum: self.collection.checksum(),
            created_at: self.created_at,
            last_interaction_at: self.last_interaction_at,
        }
    }
}

pub type SessionHandle = Arc<tokio::sync::Mutex<Session>>;

/// In-memory session registry.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session starting at `location` with `collection`.
    pub fn create(&self, location: Location, collection: Collection) -> SessionHandle {
        let id = SessionId::new_v4();
        let handle = Arc::new(tokio::sync::Mutex::new(Session::new(
            id,
            location,
            Arc::new(collection),
        )));
        self.sessions.write().insert(id, Arc::clone(&handle));
        log::info!("Created session {} at {}", id, location);
        handle
    }

    pub fn get(&self, id: SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    pub fn remove(&self, id: SessionId) -> Result<(), SessionError> {
        self.sessions
            .write()
            .remove(&id)
            .map(|_| log::info!("Removed session {}", id))
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop sessions whose last interaction is older than `max_idle`.
    ///
    /// Sessions locked by a running interaction are kept. Returns the number
    /// of evicted sessions.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(session) if session.last_interaction_at < cutoff => {
                log::info!("Evicting idle session {}", id);
                false
            }
            _ => true,
        });
        before - sessions.len()
    }

    /// Run [`Self::evict_idle`] every `sweep_interval` on the current runtime.
    pub fn spawn_eviction(&self, settings: &SessionSettings) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        let max_idle = settings.idle_ttl();
        let period = settings.sweep_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle);
                if evicted > 0 {
                    log::debug!("Evicted {} idle sessions, {} left", evicted, store.len());
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, PageId};

    fn berlin() -> Location {
        Location::new(52.516389, 13.377778)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let handle = store.create(berlin(), Collection::new());
        let id = handle.lock().await.id;

        let again = store.get(id).unwrap();
        assert!(Arc::ptr_eq(&handle, &again));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_collections() {
        let store = SessionStore::new();
        let a = store.create(berlin(), Collection::new());
        let b = store.create(berlin(), Collection::new());

        {
            let mut session = a.lock().await;
            session.collection = Arc::new(session.collection.merged(vec![Item::new(
                PageId::new(1),
                "Brandenburger Tor",
                52.5163,
                13.3777,
                10,
            )]));
        }

        assert_eq!(a.lock().await.collection.len(), 1);
        assert!(b.lock().await.collection.is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        let id = store.create(berlin(), Collection::new()).lock().await.id;

        store.remove(id).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get(id).unwrap_err(), SessionError::NotFound(id));
        assert!(store.remove(id).is_err());
    }

    #[tokio::test]
    async fn test_evict_idle_drops_only_stale_sessions() {
        let store = SessionStore::new();
        let stale = store.create(berlin(), Collection::new());
        let stale_id = {
            let mut session = stale.lock().await;
            session.last_interaction_at = Utc::now() - Duration::hours(2);
            session.id
        };
        let fresh_id = store.create(berlin(), Collection::new()).lock().await.id;

        assert_eq!(store.evict_idle(Duration::hours(1)), 1);
        assert_eq!(store.get(stale_id).unwrap_err(), SessionError::NotFound(stale_id));
        assert!(store.get(fresh_id).is_ok());
        assert_eq!(store.evict_idle(Duration::hours(1)), 0);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_busy_sessions() {
        let store = SessionStore::new();
        let handle = store.create(berlin(), Collection::new());
        let mut session = handle.lock().await;
        session.last_interaction_at = Utc::now() - Duration::hours(2);

        assert_eq!(store.evict_idle(Duration::hours(1)), 0);
        session.touch();
        drop(session);
        assert_eq!(store.evict_idle(Duration::hours(1)), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_spawned_eviction_sweeps() {
        let store = SessionStore::new();
        let handle = store.create(berlin(), Collection::new());
        handle.lock().await.last_interaction_at = Utc::now() - Duration::hours(2);

        let settings = SessionSettings {
            idle_ttl_secs: 3600,
            sweep_interval_secs: 60,
        };
        // The first tick fires immediately.
        let task = store.spawn_eviction(&settings);
        for _ in 0..100 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert!(store.is_empty());
        task.abort();
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new_v4();
        assert_eq!(id.to_string().parse::<SessionId>().unwrap(), id);
        assert!(matches!(
            "not-a-uuid".parse::<SessionId>(),
            Err(SessionError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_info() {
        let store = SessionStore::new();
        let handle = store.create(berlin(), Collection::new());
        let info = handle.lock().await.info();
        assert_eq!(info.item_count, 0);
        assert_eq!(info.max_log_views, None);
        assert_eq!(info.location, berlin());
    }
}
