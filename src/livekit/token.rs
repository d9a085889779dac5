//! LiveKit access-token minting.
//!
//! LiveKit access tokens are HS256 JWTs signed with the API secret. The
//! video grant inside the claims controls what the bearer may do in a
//! room (join, publish, subscribe, publish structured data).

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TokenError;

/// Video grant embedded in a LiveKit access token.
///
/// Field names are a wire contract with the LiveKit server (camelCase).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoGrants {
    pub room_create: bool,
    pub room_admin: bool,
    pub room_join: bool,
    pub room: String,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
}

impl VideoGrants {
    /// Grants for a participant joining a single room with full media and
    /// data-channel rights.
    pub fn participant(room: &str) -> Self {
        Self {
            room_join: true,
            room: room.to_string(),
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
            ..Default::default()
        }
    }

    /// Grants for server-side room administration (create/delete).
    pub fn service() -> Self {
        Self {
            room_create: true,
            room_admin: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    name: String,
    nbf: i64,
    exp: i64,
    video: VideoGrants,
}

/// Mints signed LiveKit access tokens.
///
/// Pure function of (identity, room, grants) — holds no per-session state.
#[derive(Clone)]
pub struct TokenMinter {
    api_key: String,
    api_secret: SecretString,
    ttl: Duration,
}

impl TokenMinter {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            ttl: config.token_ttl,
        }
    }

    /// Mint a signed token for `identity` carrying the given grants.
    pub fn mint(
        &self,
        identity: &str,
        name: &str,
        grants: VideoGrants,
    ) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: self.api_key.clone(),
            sub: identity.to_string(),
            name: name.to_string(),
            nbf: now,
            exp: now + self.ttl.as_secs() as i64,
            video: grants,
        };

        let key = EncodingKey::from_secret(self.api_secret.expose_secret().as_bytes());
        jsonwebtoken::encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Signing {
            identity: identity.to_string(),
            reason: e.to_string(),
        })
    }

    /// Token for the end user joining the session room.
    pub fn for_user(&self, identity: &str, room: &str) -> Result<String, TokenError> {
        self.mint(
            identity,
            &format!("User-{identity}"),
            VideoGrants::participant(room),
        )
    }

    /// Token for the conversational agent joining the session room.
    ///
    /// The agent identity is prefixed so the frontend can tell it apart
    /// from human participants.
    pub fn for_agent(&self, room: &str) -> Result<String, TokenError> {
        self.mint(
            &format!("agent-{room}"),
            "Voice Agent",
            VideoGrants::participant(room),
        )
    }

    /// Short-lived token used to authenticate against the room control API.
    pub(crate) fn for_service(&self) -> Result<String, TokenError> {
        self.mint(&self.api_key, "voice-onboard", VideoGrants::service())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation};

    fn minter() -> TokenMinter {
        TokenMinter {
            api_key: "test-key".to_string(),
            api_secret: SecretString::from("test-secret"),
            ttl: Duration::from_secs(3600),
        }
    }

    fn decode(token: &str) -> Claims {
        let key = DecodingKey::from_secret(b"test-secret");
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        jsonwebtoken::decode::<Claims>(token, &key, &validation)
            .expect("token should decode")
            .claims
    }

    #[test]
    fn user_token_carries_participant_grants() {
        let token = minter().for_user("alice", "session-abc").unwrap();
        let claims = decode(&token);

        assert_eq!(claims.iss, "test-key");
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.name, "User-alice");
        assert_eq!(claims.video.room, "session-abc");
        assert!(claims.video.room_join);
        assert!(claims.video.can_publish);
        assert!(claims.video.can_subscribe);
        assert!(claims.video.can_publish_data);
        assert!(!claims.video.room_create);
    }

    #[test]
    fn agent_identity_is_prefixed() {
        let token = minter().for_agent("session-abc").unwrap();
        let claims = decode(&token);

        assert_eq!(claims.sub, "agent-session-abc");
        assert_eq!(claims.name, "Voice Agent");
        assert_eq!(claims.video.room, "session-abc");
    }

    #[test]
    fn service_token_has_admin_grants() {
        let token = minter().for_service().unwrap();
        let claims = decode(&token);

        assert!(claims.video.room_create);
        assert!(claims.video.room_admin);
        assert!(!claims.video.room_join);
    }

    #[test]
    fn expiry_follows_ttl() {
        let token = minter().mint("bob", "Bob", VideoGrants::participant("r")).unwrap();
        let claims = decode(&token);
        assert_eq!(claims.exp - claims.nbf, 3600);
    }
}
