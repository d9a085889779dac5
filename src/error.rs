//! Error types for Voice Onboard.

use uuid::Uuid;

/// Top-level error type for the broker.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Room error: {0}")]
    Room(#[from] RoomError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Access-token minting errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to sign access token for {identity}: {reason}")]
    Signing { identity: String, reason: String },
}

/// Room lifecycle errors from the media-server control API.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to mint room service token: {0}")]
    Token(#[from] TokenError),

    #[error("Room service rejected {operation} for {room}: {status} {message}")]
    Api {
        operation: String,
        room: String,
        status: u16,
        message: String,
    },
}

/// Session lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session {0} not found")]
    NotFound(Uuid),
}

/// Result type alias for the broker.
pub type Result<T> = std::result::Result<T, Error>;
