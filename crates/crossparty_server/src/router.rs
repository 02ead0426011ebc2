//! Routes decoded client frames to lobby operations.

use derive_new::new;
use tracing::{debug, instrument, warn};

use crate::error::LobbyError;
use crate::lobby::Hub;
use crate::protocol::{self, ClientMessage};
use crate::registry::PlayerId;

/// Per-connection dispatcher.
///
/// Failures are reported to the sender as an `ErrorResponse`; nobody else
/// hears about them and the connection stays open.
#[derive(Debug, Clone, new)]
pub struct SessionRouter {
    hub: Hub,
}

impl SessionRouter {
    /// The hub this router dispatches to.
    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Handles one text frame from `player`.
    #[instrument(skip(self, text), fields(%player))]
    pub fn dispatch(&self, player: PlayerId, text: &str) {
        let outcome = protocol::decode(text)
            .map_err(LobbyError::from)
            .and_then(|message| self.route(player, message));
        self.finish(player, outcome);
    }

    /// Handles one binary frame from `player`, read as UTF-8 JSON.
    #[instrument(skip(self, bytes), fields(%player, len = bytes.len()))]
    pub fn dispatch_binary(&self, player: PlayerId, bytes: &[u8]) {
        let outcome = protocol::decode_bytes(bytes)
            .map_err(LobbyError::from)
            .and_then(|message| self.route(player, message));
        self.finish(player, outcome);
    }

    /// Applies a decoded message.
    ///
    /// # Errors
    ///
    /// Returns whatever the lobby operation refused.
    pub fn route(&self, player: PlayerId, message: ClientMessage) -> Result<(), LobbyError> {
        match message {
            ClientMessage::MatchingRequest { opponent, .. } => {
                self.hub.request_match(player, opponent)
            }
            ClientMessage::MatchingResponse { accepted, .. } => {
                self.hub.respond_match(player, accepted)
            }
            ClientMessage::GameMove { row_num, col_num } => {
                self.hub.play_move(player, row_num, col_num).map(|status| {
                    debug!(?status, "Move applied");
                })
            }
        }
    }

    fn finish(&self, player: PlayerId, outcome: Result<(), LobbyError>) {
        if let Err(err) = outcome {
            warn!(%player, code = %err.code(), error = %err, "Request refused");
            self.hub.report(player, &err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::protocol::ServerMessage;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn join(hub: &Hub) -> (PlayerId, UnboundedReceiver<ServerMessage>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.connect(tx);
        while rx.try_recv().is_ok() {}
        (id, rx)
    }

    fn last_error(rx: &mut UnboundedReceiver<ServerMessage>) -> Option<ErrorCode> {
        let mut code = None;
        while let Ok(msg) = rx.try_recv() {
            if let ServerMessage::ErrorResponse { code: c, .. } = msg {
                code = Some(c);
            }
        }
        code
    }

    #[test]
    fn test_malformed_frames_are_bad_requests() {
        let hub = Hub::new(3);
        let router = SessionRouter::new(hub.clone());
        let (id, mut rx) = join(&hub);

        for frame in [
            "garbage",
            r#"{"type":"Nope"}"#,
            r#"{"opponent":2}"#,
            r#"{"type":"MatchingRequest","opponent":-1}"#,
        ] {
            router.dispatch(id, frame);
            assert_eq!(last_error(&mut rx), Some(ErrorCode::BadRequest), "{frame}");
        }
        assert_eq!(hub.state_of(id), Some(crate::registry::PlayerState::Idle));
    }

    #[test]
    fn test_errors_go_to_sender_only() {
        let hub = Hub::new(3);
        let router = SessionRouter::new(hub.clone());
        let (a, mut a_rx) = join(&hub);
        let (_b, mut b_rx) = join(&hub);

        router.dispatch(a, r#"{"type":"MatchingRequest","opponent":42}"#);
        assert_eq!(last_error(&mut a_rx), Some(ErrorCode::PlayerNotFound));
        assert!(b_rx.try_recv().is_err());
    }

    #[test]
    fn test_binary_frames_route_like_text() {
        let hub = Hub::new(3);
        let router = SessionRouter::new(hub.clone());
        let (a, _a_rx) = join(&hub);
        let (b, mut b_rx) = join(&hub);

        let frame = format!(r#"{{"type":"MatchingRequest","opponent":{}}}"#, b.get());
        router.dispatch_binary(a, frame.as_bytes());
        assert!(matches!(
            b_rx.try_recv(),
            Ok(ServerMessage::MatchingRequest { opponent, .. }) if opponent == a
        ));
    }

    #[test]
    fn test_move_out_of_bounds_is_game_error() {
        let hub = Hub::new(3);
        let router = SessionRouter::new(hub.clone());
        let (a, mut a_rx) = join(&hub);
        let (b, _b_rx) = join(&hub);
        hub.request_match(a, b).expect("request");
        hub.respond_match(b, true).expect("accept");

        router.dispatch(a, r#"{"type":"GameMove","rowNum":0,"colNum":2}"#);
        assert_eq!(last_error(&mut a_rx), Some(ErrorCode::GameError));
        router.dispatch(a, r#"{"type":"GameMove","rowNum":-3,"colNum":2}"#);
        assert_eq!(last_error(&mut a_rx), Some(ErrorCode::GameError));
    }
}
