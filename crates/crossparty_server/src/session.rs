//! Game sessions and the table that owns them.
//!
//! Players refer to their session by [`SessionId`]; the table is the only
//! owner of the game state, so teardown is a single removal.

use crossparty_board::{Game, GameFault, GameStatus, Mark, Seats};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

use crate::protocol::ServerMessage;
use crate::registry::PlayerId;

/// Unique session identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("Session#{_0}")]
pub struct SessionId(u64);

impl SessionId {
    /// Raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One active match between two players.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    game: Game<PlayerId>,
}

impl GameSession {
    /// Session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The game.
    pub fn game(&self) -> &Game<PlayerId> {
        &self.game
    }

    /// Both seated players, X first.
    pub fn participants(&self) -> [PlayerId; 2] {
        let seats = self.game.seats();
        [seats.x, seats.o]
    }

    /// The other participant.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.game.seats().other(player)
    }

    /// Applies a move through the engine.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`GameFault`]; the game is unchanged on error.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn apply_move(&mut self, player: PlayerId, row: i64, col: i64) -> Result<GameStatus, GameFault> {
        self.game.apply_move(player, row, col)
    }

    /// The `GameUpdate` describing the current board, sent to both players.
    pub fn update(&self) -> ServerMessage {
        let status_line = match self.game.status() {
            GameStatus::InProgress => format!("It's {}'s turn!", self.game.current_player()),
            GameStatus::Won(mark) => format!("{mark} wins."),
            GameStatus::Draw => "It's a tie".to_string(),
        };
        ServerMessage::GameUpdate {
            message: format!("\n{}\n{}", self.game.render(), status_line),
            turn: self.game.current_player(),
            finished: self.game.is_finished(),
        }
    }

    /// The forfeit notice for the player left behind by `leaver`.
    ///
    /// `turn` is set as if the leaver had just moved, so the survivor's
    /// client sees a consistent turn hand-off.
    pub fn forfeit_update(&self, leaver: PlayerId) -> Option<(PlayerId, ServerMessage)> {
        let survivor = self.opponent_of(leaver)?;
        let turn = if self.game.current_player() == leaver {
            survivor
        } else {
            leaver
        };
        Some((
            survivor,
            ServerMessage::GameUpdate {
                message: format!("{leaver} has abandoned the game, you win."),
                turn,
                finished: true,
            },
        ))
    }

    /// Mark held by `player`.
    pub fn mark_of(&self, player: PlayerId) -> Option<Mark> {
        self.game.seats().mark_of(player)
    }
}

/// Every active session.
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<SessionId, GameSession>,
    last_id: u64,
}

impl SessionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a `size`×`size` game for `seats`.
    #[instrument(skip(self))]
    pub fn open(&mut self, seats: Seats<PlayerId>, size: usize) -> SessionId {
        self.last_id += 1;
        let id = SessionId(self.last_id);
        self.sessions.insert(
            id,
            GameSession {
                id,
                game: Game::with_size(seats, size),
            },
        );
        info!(session_id = %id, x = %seats.x, o = %seats.o, "Session opened");
        id
    }

    /// Looks up a session.
    pub fn get(&self, id: SessionId) -> Option<&GameSession> {
        self.sessions.get(&id)
    }

    /// Looks up a session for mutation.
    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut GameSession> {
        self.sessions.get_mut(&id)
    }

    /// Removes a session.
    #[instrument(skip(self))]
    pub fn close(&mut self, id: SessionId) -> Option<GameSession> {
        let closed = self.sessions.remove(&id);
        if let Some(session) = &closed {
            debug!(status = ?session.game.status(), "Session closed");
        }
        closed
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no game is running.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: PlayerId = PlayerId::new(1);
    const B: PlayerId = PlayerId::new(2);

    fn open() -> (SessionTable, SessionId) {
        let mut table = SessionTable::new();
        let id = table.open(Seats::new(A, B), 3);
        (table, id)
    }

    #[test]
    fn test_open_and_close() {
        let (mut table, id) = open();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(id).map(GameSession::participants), Some([A, B]));
        assert!(table.close(id).is_some());
        assert!(table.is_empty());
        assert!(table.close(id).is_none());
    }

    #[test]
    fn test_opening_update_names_x() {
        let (table, id) = open();
        let session = table.get(id).expect("session");
        match session.update() {
            ServerMessage::GameUpdate {
                message,
                turn,
                finished,
            } => {
                assert_eq!(turn, A);
                assert!(!finished);
                assert!(message.ends_with("It's Player#1's turn!"));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_forfeit_turn_hand_off() {
        let (mut table, id) = open();
        let session = table.get_mut(id).expect("session");

        // A to move and leaves: turn goes to the survivor.
        let (survivor, update) = session.forfeit_update(A).expect("forfeit");
        assert_eq!(survivor, B);
        assert!(matches!(update, ServerMessage::GameUpdate { turn, finished: true, .. } if turn == B));

        // B to move and A leaves: turn stays with the leaver.
        session.apply_move(A, 1, 1).expect("move");
        let (survivor, update) = session.forfeit_update(A).expect("forfeit");
        assert_eq!(survivor, B);
        assert!(matches!(update, ServerMessage::GameUpdate { turn, .. } if turn == A));
    }

    #[test]
    fn test_winning_update_is_finished() {
        let (mut table, id) = open();
        let session = table.get_mut(id).expect("session");
        for (player, row, col) in [(A, 1, 1), (B, 2, 1), (A, 1, 2), (B, 2, 2), (A, 1, 3)] {
            session.apply_move(player, row, col).expect("move");
        }
        match session.update() {
            ServerMessage::GameUpdate {
                message, finished, ..
            } => {
                assert!(finished);
                assert!(message.ends_with("X wins."));
            }
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(session.mark_of(B), Some(Mark::O));
    }
}
