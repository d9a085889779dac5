//! Session orchestration — composes token minting, room lifecycle, the
//! registry and the conversation engine into start / end / get use cases.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agent::{ControlChannel, IntentClassifier, KeywordClassifier, OnboardingEngine};
use crate::config::Config;
use crate::error::{Error, Result, SessionError};
use crate::livekit::{RoomClient, TokenMinter};

use super::registry::{SessionRecord, SessionRegistry, SessionStatus};

/// Connection details returned to the client on session start.
#[derive(Debug, Clone, Serialize)]
pub struct StartedSession {
    pub session_id: Uuid,
    pub token: String,
    pub room_name: String,
    pub livekit_url: String,
}

/// Read-only session snapshot for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub room_name: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

/// Orchestrates the full session lifecycle.
pub struct SessionService {
    registry: Arc<SessionRegistry>,
    minter: TokenMinter,
    rooms: RoomClient,
    classifier: Arc<dyn IntentClassifier>,
    livekit_url: String,
    session_timeout: Duration,
}

impl SessionService {
    pub fn new(config: &Config, registry: Arc<SessionRegistry>) -> Arc<Self> {
        let minter = TokenMinter::new(config);
        let rooms = RoomClient::new(config.room_api_url(), minter.clone());
        Arc::new(Self {
            registry,
            minter,
            rooms,
            classifier: Arc::new(KeywordClassifier),
            livekit_url: config.livekit_url.clone(),
            session_timeout: config.session_timeout,
        })
    }

    /// Start a new session: mint credentials, provision the room, register
    /// the record, and schedule the agent join plus the force-end timer.
    ///
    /// Returns connection details immediately; the engine's lifetime runs
    /// in background tasks. On any provisioning failure nothing is
    /// registered.
    pub async fn start(self: Arc<Self>, user_id: &str) -> Result<StartedSession> {
        let session_id = Uuid::new_v4();
        let room_name = format!("session-{session_id}");

        let user_token = self.minter.for_user(user_id, &room_name).map_err(Error::Token)?;
        let agent_token = self.minter.for_agent(&room_name).map_err(Error::Token)?;

        self.rooms.ensure(&room_name).await.map_err(Error::Room)?;

        let channel = ControlChannel::new();
        let engine = OnboardingEngine::new(room_name.clone(), Arc::clone(&self.classifier));

        let record = SessionRecord {
            session_id,
            room_name: room_name.clone(),
            user_token: user_token.clone(),
            agent_token,
            status: SessionStatus::Active,
            created_at: Utc::now(),
            engine: Arc::new(tokio::sync::Mutex::new(engine)),
            channel,
            timeout: None,
        };
        self.registry.insert(record).await;

        // Force-end timer; aborted on explicit end.
        let service = Arc::clone(&self);
        let timeout = self.session_timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            debug!(session_id = %session_id, "Session timeout reached");
            if let Err(e) = service.end(session_id).await {
                warn!(session_id = %session_id, error = %e, "Timeout cleanup failed");
            }
        });
        self.registry.set_timeout(session_id, timer.abort_handle()).await;

        info!(session_id = %session_id, room = %room_name, "Session started");
        Ok(StartedSession {
            session_id,
            token: user_token,
            room_name,
            livekit_url: self.livekit_url.clone(),
        })
    }

    /// End a session. Idempotent: ending an unknown or already-ended
    /// session is a successful no-op (`Ok(false)`).
    ///
    /// The registry entry is removed before the room teardown call, so a
    /// teardown failure never leaks a session.
    pub async fn end(&self, session_id: Uuid) -> Result<bool> {
        let Some(mut record) = self.registry.remove(session_id).await else {
            debug!(session_id = %session_id, "End requested for unknown session");
            return Ok(false);
        };
        record.status = SessionStatus::Ended;

        if let Some(timer) = record.timeout.take() {
            // The timeout task ends sessions through this same path; do not
            // abort ourselves mid-cleanup.
            if tokio::task::try_id() != Some(timer.id()) {
                timer.abort();
            }
        }

        record.engine.lock().await.cleanup();
        self.rooms.delete(&record.room_name).await.map_err(Error::Room)?;

        info!(session_id = %session_id, room = %record.room_name, "Session ended");
        Ok(true)
    }

    /// Snapshot of an active session.
    pub async fn get(&self, session_id: Uuid) -> Option<SessionView> {
        let record = self.registry.get(session_id).await?;
        Some(SessionView {
            session_id: record.session_id,
            room_name: record.room_name,
            status: record.status,
            created_at: record.created_at,
        })
    }

    /// Deliver a transcribed user utterance to the session's engine.
    pub async fn speech(&self, session_id: Uuid, text: &str) -> Result<()> {
        let record = self
            .registry
            .get(session_id)
            .await
            .ok_or(Error::Session(SessionError::NotFound(session_id)))?;
        record.engine.lock().await.on_user_speech_completed(text).await;
        Ok(())
    }
}
