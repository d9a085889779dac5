//! LiveKit integration: access-token minting and room lifecycle.

pub mod room;
pub mod token;

pub use room::RoomClient;
pub use token::{TokenMinter, VideoGrants};
