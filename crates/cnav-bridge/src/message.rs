//! Bridge messages
//!
//! Tagged JSON messages flowing from the map content to the host:
//! `{"type": "courtMarkerClick", "court": {...}}`.

use cnav_geo::Court;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag of a court marker tap
pub const COURT_MARKER_CLICK: &str = "courtMarkerClick";

const KNOWN_TAGS: &[&str] = &[COURT_MARKER_CLICK];

/// Message posted by the map content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BridgeMessage {
    /// User tapped a court marker
    CourtMarkerClick { court: Court },
}

/// Inbound message that could not be decoded
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("message has no type tag")]
    MissingType,

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("invalid {tag} payload: {reason}")]
    InvalidPayload { tag: String, reason: String },
}

impl BridgeMessage {
    pub fn tag(&self) -> &'static str {
        match self {
            BridgeMessage::CourtMarkerClick { .. } => COURT_MARKER_CLICK,
        }
    }

    /// Serialize for posting from the content side
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a raw posted string
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw)?;

        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(DecodeError::MissingType)?
            .to_string();
        if !KNOWN_TAGS.contains(&tag.as_str()) {
            return Err(DecodeError::UnknownType(tag));
        }

        let message: BridgeMessage = serde_json::from_value(value).map_err(|e| DecodeError::InvalidPayload {
            tag: tag.clone(),
            reason: e.to_string(),
        })?;

        match &message {
            BridgeMessage::CourtMarkerClick { court } => {
                court.validate().map_err(|e| DecodeError::InvalidPayload {
                    tag,
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(message)
    }
}
