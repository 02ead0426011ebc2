//! JSON wire protocol.
//!
//! Every frame is a JSON object with a string `type` discriminator plus
//! type-specific fields. Inbound frames decode into [`ClientMessage`],
//! outbound ones are built as [`ServerMessage`].

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{instrument, trace};

use crate::error::ErrorCode;
use crate::registry::PlayerId;

/// Discriminators a client may send.
const CLIENT_TYPES: [&str; 3] = ["MatchingRequest", "MatchingResponse", "GameMove"];

/// Messages accepted from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Propose a game to another player.
    MatchingRequest {
        /// Id of the player being invited.
        opponent: PlayerId,
        /// Optional free text; ignored by the server.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Answer a pending proposal.
    MatchingResponse {
        /// Whether the invitation is accepted.
        accepted: bool,
        /// Optional free text; ignored by the server.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Place a mark, 1-indexed.
    GameMove {
        /// Row, starting at 1.
        #[serde(rename = "rowNum")]
        row_num: i64,
        /// Column, starting at 1.
        #[serde(rename = "colNum")]
        col_num: i64,
    },
}

/// Messages pushed to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Sent once on connect with the client's player id.
    Authorization {
        /// Welcome text.
        message: String,
        /// Assigned id.
        id: PlayerId,
    },
    /// Informational text.
    Message {
        /// Text to show.
        message: String,
    },
    /// Relayed invitation.
    MatchingRequest {
        /// Inviting player.
        opponent: PlayerId,
        /// Prompt text.
        message: String,
    },
    /// Outcome of a pairing.
    MatchingResponse {
        /// Whether the pairing turned into a game.
        accepted: bool,
        /// Explanation.
        message: String,
    },
    /// Board state after a move, or the forfeit notice.
    GameUpdate {
        /// Rendered board and status line.
        message: String,
        /// Player expected to move next.
        turn: PlayerId,
        /// True once the game is over.
        finished: bool,
    },
    /// Fault report.
    ErrorResponse {
        /// Fault code.
        code: ErrorCode,
        /// Human-readable detail.
        message: String,
    },
}

/// Why an inbound frame was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DecodeError {
    /// Not JSON at all.
    #[display("payload is not valid JSON")]
    NotJson,
    /// JSON, but not an object.
    #[display("payload must be a JSON object")]
    NotAnObject,
    /// Object without a string `type`.
    #[display("missing or non-string \"type\" discriminator")]
    MissingType,
    /// `type` names nothing a client may send.
    #[display("unknown message type \"{_0}\"")]
    UnknownType(String),
    /// Known `type` with missing or mistyped fields.
    #[display("invalid fields for {kind}: {reason}")]
    InvalidFields {
        /// Discriminator that was sent.
        kind: String,
        /// Deserializer message.
        reason: String,
    },
    /// Binary frame that is not UTF-8.
    #[display("binary payload is not UTF-8")]
    NotUtf8,
}

impl std::error::Error for DecodeError {}

/// Decodes one inbound frame.
///
/// The discriminator is validated before any type-specific field is
/// interpreted, so an unknown or missing `type` is reported uniformly.
///
/// # Errors
///
/// Returns [`DecodeError`] for anything that is not a well-formed client message.
#[instrument(skip(text), fields(len = text.len()))]
pub fn decode(text: &str) -> Result<ClientMessage, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(|_| DecodeError::NotJson)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?
        .to_string();

    if !CLIENT_TYPES.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType(kind));
    }

    let message = serde_json::from_value(value).map_err(|e| DecodeError::InvalidFields {
        kind: kind.clone(),
        reason: e.to_string(),
    })?;
    trace!(%kind, "Decoded client message");
    Ok(message)
}

/// Decodes a binary frame by treating it as UTF-8 text.
///
/// # Errors
///
/// Returns [`DecodeError::NotUtf8`] or any error from [`decode`].
pub fn decode_bytes(bytes: &[u8]) -> Result<ClientMessage, DecodeError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NotUtf8)?;
    decode(text)
}

/// Serializes an outbound message.
///
/// # Errors
///
/// Propagates the serializer error; the message types here always serialize.
pub fn encode(message: &ServerMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
