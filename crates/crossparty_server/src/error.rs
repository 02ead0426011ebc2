//! Error types for the lobby, configuration and transport.

use crossparty_board::GameFault;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::protocol::{DecodeError, ServerMessage};
use crate::registry::PlayerId;

/// Fault code carried by an `ErrorResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ErrorCode {
    /// Target (or sender) is not connected.
    PlayerNotFound,
    /// Target is playing a game.
    PlayerInGame,
    /// Target is busy with another pairing.
    #[serde(alias = "PlayerBusy")]
    PlayerMatching,
    /// Malformed or out-of-protocol request.
    BadRequest,
    /// Move rejected by the game engine.
    GameError,
}

/// A request the lobby refused. Reported to the sender only.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LobbyError {
    /// No connected player has this id.
    #[display("This player doesn't exist, please double check their ID!")]
    PlayerNotFound {
        /// Id that was looked up.
        id: PlayerId,
    },
    /// Target is already in a game.
    #[display("This player is currently in a game, please try another ID.")]
    PlayerInGame {
        /// Busy player.
        id: PlayerId,
    },
    /// Target is already negotiating with someone.
    #[display("This player is currently matching, please try again later.")]
    PlayerMatching {
        /// Busy player.
        id: PlayerId,
    },
    /// Requester named themself.
    #[display("You can't match against yourself!")]
    SelfMatch,
    /// Responder has nothing to answer.
    #[display("There is no pending match request to answer.")]
    NoPendingMatch,
    /// Only the invited side of a pairing may answer it.
    #[display("Only the invited player can answer a match request.")]
    NotRequestTarget,
    /// Requester already has a pending pairing.
    #[display("You already have a pending match request.")]
    AlreadyMatching,
    /// Requester is already playing.
    #[display("You are already in a game.")]
    AlreadyInGame,
    /// Move sent outside a game.
    #[display("You are not in a game.")]
    NotInGame,
    /// Move sent out of turn.
    #[display("It's not your turn!")]
    NotYourTurn,
    /// Payload could not be decoded.
    #[display("Malformed request: {_0}")]
    Malformed(DecodeError),
    /// Engine refused the move.
    #[display("{_0}")]
    Game(GameFault),
}

impl LobbyError {
    /// Wire code for this fault.
    pub fn code(&self) -> ErrorCode {
        match self {
            LobbyError::PlayerNotFound { .. } | LobbyError::NoPendingMatch => {
                ErrorCode::PlayerNotFound
            }
            LobbyError::PlayerInGame { .. } => ErrorCode::PlayerInGame,
            LobbyError::PlayerMatching { .. } | LobbyError::SelfMatch => ErrorCode::PlayerMatching,
            LobbyError::NotRequestTarget
            | LobbyError::AlreadyMatching
            | LobbyError::AlreadyInGame
            | LobbyError::NotInGame
            | LobbyError::NotYourTurn
            | LobbyError::Malformed(_) => ErrorCode::BadRequest,
            LobbyError::Game(_) => ErrorCode::GameError,
        }
    }

    /// Builds the `ErrorResponse` reported to the offending sender.
    pub fn to_response(&self) -> ServerMessage {
        ServerMessage::ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl std::error::Error for LobbyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LobbyError::Malformed(e) => Some(e),
            LobbyError::Game(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for LobbyError {
    fn from(err: DecodeError) -> Self {
        LobbyError::Malformed(err)
    }
}

impl From<GameFault> for LobbyError {
    fn from(err: GameFault) -> Self {
        LobbyError::Game(err)
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Transport-level failure (bind, accept loop).
#[derive(Debug, Clone, Display, Error)]
#[display("Server error: {} at {}:{}", message, file, line)]
pub struct ServerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServerError {
    /// Creates a new server error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ServerError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_names() {
        let json = serde_json::to_string(&ErrorCode::PlayerMatching).expect("serialize");
        assert_eq!(json, "\"PlayerMatching\"");
        let busy: ErrorCode = serde_json::from_str("\"PlayerBusy\"").expect("alias");
        assert_eq!(busy, ErrorCode::PlayerMatching);
    }

    #[test]
    fn test_game_fault_maps_to_game_error() {
        let err = LobbyError::from(GameFault::CellOccupied { row: 1, col: 1 });
        assert_eq!(err.code(), ErrorCode::GameError);
        assert_eq!(err.to_string(), "Can't play a move on a non-empty cell!");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_response_carries_code_and_text() {
        let err = LobbyError::PlayerNotFound {
            id: PlayerId::new(7),
        };
        assert_eq!(
            err.to_response(),
            ServerMessage::ErrorResponse {
                code: ErrorCode::PlayerNotFound,
                message: "This player doesn't exist, please double check their ID!".to_string(),
            }
        );
    }

    #[test]
    fn test_config_error_records_location() {
        let err = ConfigError::new("bad port");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().starts_with("Config error: bad port at"));
    }
}
