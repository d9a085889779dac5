//! Control-channel protocol — structured (non-audio) messages exchanged
//! with the frontend, JSON-encoded with an `action` discriminator.
//!
//! Field names on both directions are a compatibility contract with the
//! existing frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::Stage;

/// Inbound message from the frontend.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Move to the next onboarding stage.
    AdvanceStage,
    /// The user picked a payment method.
    PaymentSelected {
        #[serde(default)]
        choice: String,
    },
    /// Jump to a specific stage (stepper navigation).
    SetStage {
        #[serde(default = "default_stage")]
        stage: i64,
    },
}

fn default_stage() -> i64 {
    1
}

/// Outbound message to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A chat message to render in the transcript view.
    NewMessage { role: Role, content: String },
    /// Directive: change the displayed stage.
    SetStage { stage: Stage },
    /// Directive: open the EMI details modal.
    ShowEmiModal,
}

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// One entry of the per-session conversation transcript.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
