//! Room lifecycle calls against the LiveKit RoomService API.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::RoomError;

use super::token::TokenMinter;

/// Rooms are closed by the server after sitting empty this long.
const EMPTY_TIMEOUT_SECS: u32 = 300;
/// Agent + user.
const MAX_PARTICIPANTS: u32 = 2;

/// Thin client for the media server's room control API.
///
/// Stateless pass-through: create (idempotent) and delete.
#[derive(Clone)]
pub struct RoomClient {
    http: reqwest::Client,
    base_url: String,
    minter: TokenMinter,
}

impl RoomClient {
    pub fn new(base_url: String, minter: TokenMinter) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            minter,
        }
    }

    /// Create the room if it does not already exist.
    ///
    /// An "already exists" answer from the server is treated as success.
    pub async fn ensure(&self, room_name: &str) -> Result<(), RoomError> {
        let body = json!({
            "name": room_name,
            "empty_timeout": EMPTY_TIMEOUT_SECS,
            "max_participants": MAX_PARTICIPANTS,
        });
        let response = self.call("CreateRoom", &body).await?;

        if response.status().is_success() {
            info!(room = %room_name, "Room created");
            return Ok(());
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        if message.contains("already exists") {
            debug!(room = %room_name, "Room already exists");
            return Ok(());
        }

        Err(RoomError::Api {
            operation: "CreateRoom".to_string(),
            room: room_name.to_string(),
            status,
            message,
        })
    }

    /// Delete the room, disconnecting any remaining participants.
    pub async fn delete(&self, room_name: &str) -> Result<(), RoomError> {
        let body = json!({ "room": room_name });
        let response = self.call("DeleteRoom", &body).await?;

        if response.status().is_success() {
            info!(room = %room_name, "Room deleted");
            return Ok(());
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        warn!(room = %room_name, status, "Room deletion rejected");
        Err(RoomError::Api {
            operation: "DeleteRoom".to_string(),
            room: room_name.to_string(),
            status,
            message,
        })
    }

    async fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, RoomError> {
        let token = self.minter.for_service()?;
        let url = format!("{}/twirp/livekit.RoomService/{method}", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }
}
