//! Stage conversation engine — one instance per live session.
//!
//! The engine tracks the current onboarding stage, collects session-scoped
//! choices, keeps the conversation transcript, and reacts to control
//! messages and user speech by emitting scripted messages and UI
//! directives on its control channel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::intent::{Intent, IntentClassifier};
use super::protocol::{AgentEvent, ClientEvent, Role, TranscriptEntry};
use super::script;
use super::stage::Stage;

/// Fan-out capacity per session; a session has at most a handful of
/// directives in flight.
const CHANNEL_CAPACITY: usize = 64;

/// Per-session outbound channel handle.
///
/// Established once at session start and held for the engine's lifetime.
/// Sending with no connected client is a silent no-op.
#[derive(Clone)]
pub struct ControlChannel {
    tx: broadcast::Sender<AgentEvent>,
}

impl ControlChannel {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to outbound events. Each connected client calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.tx.subscribe()
    }

    /// Send an event to all connected clients, if any.
    pub fn send(&self, event: AgentEvent) {
        // Ok if nobody is listening.
        let _ = self.tx.send(event);
    }
}

impl Default for ControlChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// The stage-driven conversation engine.
pub struct OnboardingEngine {
    room_name: String,
    stage: Stage,
    session_data: HashMap<String, String>,
    transcript: Vec<TranscriptEntry>,
    channel: Option<ControlChannel>,
    classifier: Arc<dyn IntentClassifier>,
}

impl OnboardingEngine {
    pub fn new(room_name: String, classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            room_name,
            stage: Stage::FIRST,
            session_data: HashMap::new(),
            transcript: Vec::new(),
            channel: None,
            classifier,
        }
    }

    /// Bind the engine to its control channel and greet the user.
    ///
    /// Calling this again re-binds the channel and sends a fresh welcome;
    /// a client that reconnects is greeted again.
    pub fn on_join(&mut self, channel: ControlChannel) {
        info!(room = %self.room_name, "Agent joined session");
        self.channel = Some(channel);
        self.emit_message(Role::Agent, script::WELCOME);
    }

    /// Dispatch one raw control-channel frame from the client.
    ///
    /// Malformed or unrecognized frames are logged and dropped; nothing
    /// here can take the engine down.
    pub fn handle_inbound(&mut self, raw: &str) {
        let event: ClientEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(room = %self.room_name, error = %e, "Ignoring unrecognized control message");
                return;
            }
        };

        debug!(room = %self.room_name, event = ?event, "Control message received");
        match event {
            ClientEvent::AdvanceStage => self.advance_stage(),
            ClientEvent::PaymentSelected { choice } => self.payment_selected(choice),
            ClientEvent::SetStage { stage } => self.set_stage(stage),
        }
    }

    /// Move to the next stage, or report completion when already at the end.
    fn advance_stage(&mut self) {
        match self.stage.next() {
            Some(next) => {
                self.stage = next;
                self.send(AgentEvent::SetStage { stage: next });
                self.emit_message(Role::Agent, script::stage_message(next));
            }
            None => {
                self.emit_message(Role::Agent, script::COMPLETION);
            }
        }
    }

    /// Jump to a specific stage. Out-of-range requests are ignored.
    fn set_stage(&mut self, requested: i64) {
        match Stage::new(requested) {
            Some(stage) => {
                self.stage = stage;
                self.send(AgentEvent::SetStage { stage });
                self.emit_message(Role::Agent, script::stage_message(stage));
            }
            None => {
                debug!(room = %self.room_name, requested, "Ignoring out-of-range stage request");
            }
        }
    }

    /// Record the payment choice and acknowledge it. EMI choices also get
    /// the EMI details modal.
    fn payment_selected(&mut self, choice: String) {
        let ack = script::payment_ack(&choice);
        let wants_emi = choice.to_lowercase().contains("emi");
        self.session_data.insert("payment_choice".to_string(), choice);

        self.emit_message(Role::Agent, &ack);
        if wants_emi {
            self.send(AgentEvent::ShowEmiModal);
        }
    }

    /// Called by the speech-to-text pipeline when a user utterance ends.
    ///
    /// Echoes the transcript line back to the client, then answers based
    /// on the classified intent.
    pub async fn on_user_speech_completed(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.emit_message(Role::User, text);

        let reply = match self.classifier.classify(text).await {
            Intent::PaymentQuery => script::PAYMENT_OPTIONS,
            Intent::DocumentQuery => script::DOCUMENT_REQUIREMENTS,
            Intent::Unknown => script::FALLBACK,
        };
        self.emit_message(Role::Agent, reply);
    }

    /// Detach from the channel. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if self.channel.take().is_some() {
            info!(room = %self.room_name, "Agent detached from session");
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn session_data(&self) -> &HashMap<String, String> {
        &self.session_data
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    /// Append to the transcript and send the matching chat message, so the
    /// transcript always mirrors what the client was shown.
    fn emit_message(&mut self, role: Role, content: &str) {
        self.transcript.push(TranscriptEntry {
            role,
            content: content.to_string(),
            timestamp: chrono::Utc::now(),
        });
        self.send(AgentEvent::NewMessage {
            role,
            content: content.to_string(),
        });
    }

    fn send(&self, event: AgentEvent) {
        match &self.channel {
            Some(channel) => channel.send(event),
            None => debug!(room = %self.room_name, "Dropping event, channel not bound"),
        }
    }
}
