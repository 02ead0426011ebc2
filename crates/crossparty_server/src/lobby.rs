//! Process-wide lobby state and the shared handle to it.
//!
//! [`Lobby`] holds the player registry, the pending-match table and the
//! session table. [`Hub`] wraps it in one mutex: every operation locks once,
//! applies its whole transition (including queuing every message it causes)
//! and unlocks. Sends are non-blocking channel pushes, so nothing waits on
//! I/O inside the lock.

use crossparty_board::{DEFAULT_SIZE, GameStatus, Seats};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::error::LobbyError;
use crate::matchmaking::MatchTable;
use crate::protocol::ServerMessage;
use crate::registry::{Outbox, PlayerId, PlayerRegistry, PlayerState};
use crate::session::{SessionId, SessionTable};

/// Everything the server knows about connected players.
#[derive(Debug)]
pub struct Lobby {
    pub(crate) players: PlayerRegistry,
    pub(crate) matches: MatchTable,
    pub(crate) sessions: SessionTable,
    board_size: usize,
}

impl Lobby {
    /// Creates an empty lobby whose games use `board_size`×`board_size` boards.
    pub fn new(board_size: usize) -> Self {
        Self {
            players: PlayerRegistry::new(),
            matches: MatchTable::new(),
            sessions: SessionTable::new(),
            board_size: board_size.max(1),
        }
    }

    /// Current state of `player`, or `None` if not connected.
    ///
    /// Derived from the session back-reference and the match table, which
    /// are never both set for one player.
    pub fn state_of(&self, player: PlayerId) -> Option<PlayerState> {
        let record = self.players.lookup(player)?;
        if let Some(session) = record.session() {
            return Some(PlayerState::InGame(session));
        }
        Some(match self.matches.partner_of(player) {
            Some(partner) => PlayerState::Matching(partner),
            None => PlayerState::Idle,
        })
    }

    /// Registers a new connection and sends its `Authorization`.
    #[instrument(skip(self, outbox))]
    pub fn connect(&mut self, outbox: Outbox) -> PlayerId {
        let id = self.players.register(outbox);
        self.send(
            id,
            ServerMessage::Authorization {
                message: format!("Welcome {id}, please remember your ID!"),
                id,
            },
        );
        id
    }

    /// Applies a move for `player` and broadcasts the result to both seats.
    ///
    /// A finished game is closed after its final update is queued, leaving
    /// both players idle.
    ///
    /// # Errors
    ///
    /// - [`LobbyError::PlayerNotFound`] if `player` is not connected
    /// - [`LobbyError::NotInGame`] / [`LobbyError::NotYourTurn`] for out-of-protocol moves
    /// - [`LobbyError::Game`] if the engine rejects the move
    #[instrument(skip(self))]
    pub fn play_move(&mut self, player: PlayerId, row: i64, col: i64) -> Result<GameStatus, LobbyError> {
        let session_id = match self.state_of(player) {
            None => return Err(LobbyError::PlayerNotFound { id: player }),
            Some(PlayerState::InGame(session)) => session,
            Some(_) => return Err(LobbyError::NotInGame),
        };
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(LobbyError::NotInGame)?;
        if session.game().current_player() != player {
            return Err(LobbyError::NotYourTurn);
        }

        let status = session.apply_move(player, row, col)?;
        let update = session.update();
        let participants = session.participants();

        for participant in participants {
            self.send(participant, update.clone());
        }
        if status.is_finished() {
            info!(%session_id, ?status, "Game over");
            self.end_session(session_id);
        }
        Ok(status)
    }

    /// Releases everything `player` held and forgets them.
    ///
    /// An opponent in game wins by forfeit; a pending partner is told the
    /// pairing is off. Either way the partner ends up idle.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, player: PlayerId) {
        match self.state_of(player) {
            None => {
                debug!("Disconnect for unknown player");
                return;
            }
            Some(PlayerState::InGame(session)) => self.forfeit(player, session),
            Some(PlayerState::Matching(_)) => self.abandon_match(player),
            Some(PlayerState::Idle) => {}
        }
        self.players.remove(player);
    }

    /// Reports `error` to `player` only.
    pub fn report(&self, player: PlayerId, error: &LobbyError) {
        self.send(player, error.to_response());
    }

    /// Number of connected players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Number of running games.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of unanswered proposals.
    pub fn pending_match_count(&self) -> usize {
        self.matches.len()
    }

    pub(crate) fn send(&self, player: PlayerId, message: ServerMessage) {
        match self.players.lookup(player) {
            Some(record) => record.send(message),
            None => debug!(%player, "Message for disconnected player dropped"),
        }
    }

    /// Opens a session for `seats` and sends the opening board to both.
    pub(crate) fn start_session(&mut self, seats: Seats<PlayerId>) {
        let session_id = self.sessions.open(seats, self.board_size);
        for player in [seats.x, seats.o] {
            if let Some(record) = self.players.lookup_mut(player) {
                record.set_session(Some(session_id));
            }
        }
        if let Some(session) = self.sessions.get(session_id) {
            let update = session.update();
            for player in session.participants() {
                self.send(player, update.clone());
            }
        }
    }

    fn forfeit(&mut self, leaver: PlayerId, session_id: SessionId) {
        if let Some((survivor, update)) = self
            .sessions
            .get(session_id)
            .and_then(|session| session.forfeit_update(leaver))
        {
            info!(%leaver, %survivor, %session_id, "Game forfeited");
            self.send(survivor, update);
        }
        self.end_session(session_id);
    }

    fn end_session(&mut self, session_id: SessionId) {
        let Some(session) = self.sessions.close(session_id) else {
            return;
        };
        for player in session.participants() {
            if let Some(record) = self.players.lookup_mut(player) {
                record.set_session(None);
            }
        }
    }
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

/// Cloneable, thread-safe handle to the lobby.
#[derive(Debug, Clone, Default)]
pub struct Hub {
    lobby: Arc<Mutex<Lobby>>,
}

impl Hub {
    /// Creates a hub whose games use `board_size` boards.
    #[instrument]
    pub fn new(board_size: usize) -> Self {
        info!(board_size, "Creating lobby");
        Self {
            lobby: Arc::new(Mutex::new(Lobby::new(board_size))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Lobby> {
        self.lobby.lock().unwrap_or_else(|poisoned| {
            warn!("Lobby lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// See [`Lobby::connect`].
    pub fn connect(&self, outbox: Outbox) -> PlayerId {
        self.lock().connect(outbox)
    }

    /// See [`Lobby::request_match`].
    pub fn request_match(&self, requester: PlayerId, target: PlayerId) -> Result<(), LobbyError> {
        self.lock().request_match(requester, target)
    }

    /// See [`Lobby::respond_match`].
    pub fn respond_match(&self, responder: PlayerId, accepted: bool) -> Result<(), LobbyError> {
        self.lock().respond_match(responder, accepted)
    }

    /// See [`Lobby::play_move`].
    pub fn play_move(&self, player: PlayerId, row: i64, col: i64) -> Result<GameStatus, LobbyError> {
        self.lock().play_move(player, row, col)
    }

    /// See [`Lobby::disconnect`].
    pub fn disconnect(&self, player: PlayerId) {
        self.lock().disconnect(player)
    }

    /// See [`Lobby::report`].
    pub fn report(&self, player: PlayerId, error: &LobbyError) {
        self.lock().report(player, error)
    }

    /// See [`Lobby::state_of`].
    pub fn state_of(&self, player: PlayerId) -> Option<PlayerState> {
        self.lock().state_of(player)
    }

    /// Number of connected players.
    pub fn player_count(&self) -> usize {
        self.lock().player_count()
    }

    /// Number of running games.
    pub fn session_count(&self) -> usize {
        self.lock().session_count()
    }

    /// Number of unanswered proposals.
    pub fn pending_match_count(&self) -> usize {
        self.lock().pending_match_count()
    }
}
