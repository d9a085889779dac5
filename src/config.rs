//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Broker configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// LiveKit server URL handed to clients (ws:// or wss://).
    pub livekit_url: String,
    /// LiveKit API key (the token issuer).
    pub api_key: String,
    /// LiveKit API secret used to sign access tokens.
    pub api_secret: SecretString,
    /// Port for the HTTP/WebSocket server.
    pub port: u16,
    /// Upper-bound session lifetime; sessions are force-ended after this.
    pub session_timeout: Duration,
    /// Access token validity window.
    pub token_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `LIVEKIT_URL`, `LIVEKIT_API_KEY` and `LIVEKIT_API_SECRET` are
    /// required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let livekit_url = require_env("LIVEKIT_URL")?;
        let api_key = require_env("LIVEKIT_API_KEY")?;
        let api_secret = SecretString::from(require_env("LIVEKIT_API_SECRET")?);

        let port: u16 = parse_env("VOICE_ONBOARD_PORT", 8080)?;
        let timeout_secs: u64 = parse_env("VOICE_ONBOARD_SESSION_TIMEOUT_SECS", 300)?;
        let ttl_secs: u64 = parse_env("VOICE_ONBOARD_TOKEN_TTL_SECS", 3600)?;

        Ok(Self {
            livekit_url,
            api_key,
            api_secret,
            port,
            session_timeout: Duration::from_secs(timeout_secs),
            token_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// Base HTTP URL of the room control API, derived from the media URL.
    pub fn room_api_url(&self) -> String {
        self.livekit_url
            .replacen("wss://", "https://", 1)
            .replacen("ws://", "http://", 1)
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("cannot parse {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_api_url_rewrites_scheme() {
        let config = Config {
            livekit_url: "ws://localhost:7880".to_string(),
            api_key: "key".to_string(),
            api_secret: SecretString::from("secret"),
            port: 8080,
            session_timeout: Duration::from_secs(300),
            token_ttl: Duration::from_secs(3600),
        };
        assert_eq!(config.room_api_url(), "http://localhost:7880");

        let secure = Config {
            livekit_url: "wss://lk.example.com".to_string(),
            ..config
        };
        assert_eq!(secure.room_api_url(), "https://lk.example.com");
    }
}
