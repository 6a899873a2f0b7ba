//! Wire payloads for the sync transport.
//!
//! The transport itself (WebSocket/HTTP) is owned by an external messaging
//! layer; this module only fixes the payload shapes:
//!
//! - command: `{"type": "PLAY", "serverTimestampMs": 1772395200000}`
//! - status:  `{"cumulativeDelayMs": 47000}`

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// The five director commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    /// Start or resume the show.
    Play,
    /// Pause the show.
    Pause,
    /// Emergency technical hold.
    Safety,
    /// End the show, freezing the displayed clock.
    Complete,
    /// Fully reset the session.
    Stop,
}

/// A discrete director command, stamped with the server's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMessage {
    /// The command to apply.
    #[serde(rename = "type")]
    pub kind: CommandKind,
    /// Server wall-clock milliseconds when the command was issued.
    pub server_timestamp_ms: i64,
}

/// Lower-frequency status heartbeat carrying the director's authoritative
/// cumulative pause duration (the drift-correction channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    /// Authoritative cumulative delay in milliseconds.
    pub cumulative_delay_ms: i64,
}

impl CommandMessage {
    /// Decodes a command payload.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Malformed` for undecodable payloads.
    pub fn decode(payload: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encodes the command payload.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serialization of a derived Serialize type to a string is infallible.
        serde_json::to_string(self).expect("CommandMessage serialization is infallible")
    }
}

impl StatusMessage {
    /// Decodes a status payload.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Malformed` for undecodable payloads.
    pub fn decode(payload: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Encodes the status payload.
    #[must_use]
    pub fn encode(&self) -> String {
        // Serialization of a derived Serialize type to a string is infallible.
        serde_json::to_string(self).expect("StatusMessage serialization is infallible")
    }
}
