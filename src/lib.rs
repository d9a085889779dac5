//! Voice Onboard — backend broker for real-time voice onboarding sessions.

pub mod agent;
pub mod config;
pub mod error;
pub mod knowledge;
pub mod livekit;
pub mod server;
pub mod session;
