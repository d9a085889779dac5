//! The onboarding agent: stage state machine, control-channel protocol,
//! scripted messages, and the conversation engine.

pub mod engine;
pub mod intent;
pub mod protocol;
pub mod script;
pub mod stage;

pub use engine::{ControlChannel, OnboardingEngine};
pub use intent::{Intent, IntentClassifier, KeywordClassifier};
pub use protocol::{AgentEvent, ClientEvent, Role, TranscriptEntry};
pub use stage::Stage;
