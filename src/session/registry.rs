//! In-memory session registry.
//!
//! The registry is the only shared mutable state in the process. It is an
//! explicitly owned object injected into the service — create, lookup and
//! remove are the whole surface.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::agent::{ControlChannel, OnboardingEngine};

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Ended,
}

/// One live onboarding session.
#[derive(Clone)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub room_name: String,
    pub user_token: String,
    pub agent_token: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    /// The session's conversation engine; owned for the record's lifetime.
    pub engine: Arc<Mutex<OnboardingEngine>>,
    /// Outbound channel handle shared with connected clients.
    pub channel: ControlChannel,
    /// Handle to the force-end timer, set once the timer task is spawned.
    pub timeout: Option<AbortHandle>,
}

/// Map of session id → record behind a single lock.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, SessionRecord>>,
}

impl SessionRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub async fn insert(&self, record: SessionRecord) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(record.session_id, record);
    }

    pub async fn get(&self, session_id: Uuid) -> Option<SessionRecord> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    /// Find the session bound to a room. Rooms map 1:1 to sessions.
    pub async fn find_by_room(&self, room_name: &str) -> Option<SessionRecord> {
        self.sessions
            .read()
            .await
            .values()
            .find(|record| record.room_name == room_name)
            .cloned()
    }

    /// Remove and return a session. Returns `None` when already removed,
    /// which makes racing end paths (explicit end vs. timeout) safe.
    pub async fn remove(&self, session_id: Uuid) -> Option<SessionRecord> {
        self.sessions.write().await.remove(&session_id)
    }

    /// Attach the force-end timer handle to an already-inserted record.
    pub async fn set_timeout(&self, session_id: Uuid, handle: AbortHandle) {
        if let Some(record) = self.sessions.write().await.get_mut(&session_id) {
            record.timeout = Some(handle);
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::KeywordClassifier;

    fn make_record(room: &str) -> SessionRecord {
        let session_id = Uuid::new_v4();
        SessionRecord {
            session_id,
            room_name: room.to_string(),
            user_token: "user-token".to_string(),
            agent_token: "agent-token".to_string(),
            status: SessionStatus::Active,
            created_at: Utc::now(),
            engine: Arc::new(Mutex::new(OnboardingEngine::new(
                room.to_string(),
                Arc::new(KeywordClassifier),
            ))),
            channel: ControlChannel::new(),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty().await);

        let record = make_record("session-a");
        let id = record.session_id;
        registry.insert(record).await;

        assert_eq!(registry.len().await, 1);
        let found = registry.get(id).await.unwrap();
        assert_eq!(found.room_name, "session-a");
        assert_eq!(found.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn find_by_room() {
        let registry = SessionRegistry::new();
        registry.insert(make_record("session-a")).await;
        registry.insert(make_record("session-b")).await;

        let found = registry.find_by_room("session-b").await.unwrap();
        assert_eq!(found.room_name, "session-b");
        assert!(registry.find_by_room("session-c").await.is_none());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = SessionRegistry::new();
        let record = make_record("session-a");
        let id = record.session_id;
        registry.insert(record).await;

        assert!(registry.remove(id).await.is_some());
        assert!(registry.remove(id).await.is_none());
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn distinct_sessions_get_distinct_ids() {
        let registry = SessionRegistry::new();
        let a = make_record("session-a");
        let b = make_record("session-b");
        assert_ne!(a.session_id, b.session_id);
        registry.insert(a).await;
        registry.insert(b).await;
        assert_eq!(registry.len().await, 2);
    }
}
