//! Player registry: one record per live connection.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::protocol::ServerMessage;
use crate::session::SessionId;

/// Unique player identifier, assigned at connection time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("Player#{_0}")]
pub struct PlayerId(u64);

impl PlayerId {
    /// Wraps a raw id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Outbound channel to one client.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Where a player stands in the lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Free for a new pairing.
    Idle,
    /// Negotiating with the given player.
    Matching(PlayerId),
    /// Playing in the given session.
    InGame(SessionId),
}

/// A connected player.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    outbox: Outbox,
    session: Option<SessionId>,
}

impl Player {
    /// Player id.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Session this player is seated in.
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub(crate) fn set_session(&mut self, session: Option<SessionId>) {
        self.session = session;
    }

    /// Queues `message` for this client without waiting.
    ///
    /// A closed outbox means the connection is already going away; the
    /// message is dropped.
    pub fn send(&self, message: ServerMessage) {
        if self.outbox.send(message).is_err() {
            debug!(player_id = %self.id, "Outbox closed, dropping message");
        }
    }
}

/// All connected players.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    last_id: u64,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player and returns its id. Ids are never reused.
    #[instrument(skip(self, outbox))]
    pub fn register(&mut self, outbox: Outbox) -> PlayerId {
        self.last_id += 1;
        let id = PlayerId(self.last_id);
        self.players.insert(
            id,
            Player {
                id,
                outbox,
                session: None,
            },
        );
        info!(player_id = %id, online = self.players.len(), "Player registered");
        id
    }

    /// Looks up a player.
    pub fn lookup(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Looks up a player for mutation.
    pub fn lookup_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// True if `id` is connected.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    /// Removes a player record.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let removed = self.players.remove(&id);
        if removed.is_some() {
            info!(player_id = %id, online = self.players.len(), "Player removed");
        }
        removed
    }

    /// Number of connected players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// True when nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
