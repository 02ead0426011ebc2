//! Mutual-consent pairing between two idle players.
//!
//! A pending pairing is stored once, under a key built from both ids, so the
//! relation is reciprocal by construction: removing it frees both sides.

use crossparty_board::Seats;
use derive_new::new;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

use crate::error::LobbyError;
use crate::lobby::Lobby;
use crate::protocol::ServerMessage;
use crate::registry::{PlayerId, PlayerState};

/// Canonical key for a pair of players: lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    low: PlayerId,
    high: PlayerId,
}

impl MatchKey {
    /// Key for the unordered pair `{a, b}`.
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// A proposal awaiting the target's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct PendingMatch {
    /// Player who sent the proposal.
    pub requester: PlayerId,
    /// Player asked to answer it.
    pub target: PlayerId,
}

impl PendingMatch {
    /// Key under which this proposal is stored.
    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.requester, self.target)
    }

    /// The other side of the proposal from `player`'s point of view.
    pub fn partner_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.requester {
            Some(self.target)
        } else if player == self.target {
            Some(self.requester)
        } else {
            None
        }
    }
}

/// All pending proposals.
#[derive(Debug, Default)]
pub struct MatchTable {
    pending: HashMap<MatchKey, PendingMatch>,
    index: HashMap<PlayerId, MatchKey>,
}

impl MatchTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a proposal. Returns `false`, leaving the table unchanged, if
    /// either player already has one.
    pub fn insert(&mut self, pending: PendingMatch) -> bool {
        if pending.requester == pending.target
            || self.index.contains_key(&pending.requester)
            || self.index.contains_key(&pending.target)
        {
            return false;
        }
        let key = pending.key();
        self.index.insert(pending.requester, key);
        self.index.insert(pending.target, key);
        self.pending.insert(key, pending);
        true
    }

    /// The proposal `player` is part of.
    pub fn pending_for(&self, player: PlayerId) -> Option<&PendingMatch> {
        self.index.get(&player).and_then(|key| self.pending.get(key))
    }

    /// Who `player` is negotiating with.
    pub fn partner_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.pending_for(player).and_then(|m| m.partner_of(player))
    }

    /// Removes the proposal `player` is part of, for both sides at once.
    pub fn take(&mut self, player: PlayerId) -> Option<PendingMatch> {
        let key = *self.index.get(&player)?;
        let pending = self.pending.remove(&key)?;
        self.index.remove(&pending.requester);
        self.index.remove(&pending.target);
        Some(pending)
    }

    /// Number of pending proposals.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Lobby {
    /// Proposes a game from `requester` to `target`.
    ///
    /// On success both players are `Matching` each other, the requester is
    /// told to wait, and the target receives the invitation.
    ///
    /// # Errors
    ///
    /// - [`LobbyError::AlreadyInGame`] / [`LobbyError::AlreadyMatching`] if the requester is busy
    /// - [`LobbyError::PlayerNotFound`] if the target is not connected
    /// - [`LobbyError::SelfMatch`] / [`LobbyError::PlayerMatching`] if the target is the requester or is matching
    /// - [`LobbyError::PlayerInGame`] if the target is playing
    #[instrument(skip(self))]
    pub fn request_match(&mut self, requester: PlayerId, target: PlayerId) -> Result<(), LobbyError> {
        match self.state_of(requester) {
            None => return Err(LobbyError::PlayerNotFound { id: requester }),
            Some(PlayerState::InGame(_)) => return Err(LobbyError::AlreadyInGame),
            Some(PlayerState::Matching(_)) => return Err(LobbyError::AlreadyMatching),
            Some(PlayerState::Idle) => {}
        }

        match self.state_of(target) {
            None => return Err(LobbyError::PlayerNotFound { id: target }),
            Some(_) if target == requester => return Err(LobbyError::SelfMatch),
            Some(PlayerState::Matching(_)) => return Err(LobbyError::PlayerMatching { id: target }),
            Some(PlayerState::InGame(_)) => return Err(LobbyError::PlayerInGame { id: target }),
            Some(PlayerState::Idle) => {}
        }

        if !self.matches.insert(PendingMatch::new(requester, target)) {
            warn!("Match table refused an idle pair");
            return Err(LobbyError::PlayerMatching { id: target });
        }

        info!(%requester, %target, "Match requested");
        self.send(
            requester,
            ServerMessage::Message {
                message: "Waiting for the player's response!".to_string(),
            },
        );
        self.send(
            target,
            ServerMessage::MatchingRequest {
                opponent: requester,
                message: format!("{requester} wants to play against you, do you accept?"),
            },
        );
        Ok(())
    }

    /// Answers the proposal `responder` received.
    ///
    /// The pairing is cleared for both players either way. On acceptance a
    /// session starts with the requester as X and the responder as O.
    ///
    /// # Errors
    ///
    /// - [`LobbyError::PlayerNotFound`] if the responder is not connected
    /// - [`LobbyError::NoPendingMatch`] if nothing is pending
    /// - [`LobbyError::NotRequestTarget`] if the responder sent the proposal
    #[instrument(skip(self))]
    pub fn respond_match(&mut self, responder: PlayerId, accepted: bool) -> Result<(), LobbyError> {
        if !self.players.contains(responder) {
            return Err(LobbyError::PlayerNotFound { id: responder });
        }
        match self.matches.pending_for(responder) {
            None => return Err(LobbyError::NoPendingMatch),
            Some(pending) if pending.requester == responder => {
                return Err(LobbyError::NotRequestTarget);
            }
            Some(_) => {}
        }
        let pending = self.matches.take(responder).ok_or(LobbyError::NoPendingMatch)?;

        let message = if accepted {
            "Your request was accepted, the match is about to start!"
        } else {
            "Your request was rejected."
        };
        info!(requester = %pending.requester, accepted, "Match answered");
        self.send(
            pending.requester,
            ServerMessage::MatchingResponse {
                accepted,
                message: message.to_string(),
            },
        );

        if accepted {
            self.start_session(Seats::new(pending.requester, pending.target));
        }
        Ok(())
    }

    /// Tears down `leaver`'s pending proposal and tells the other side.
    pub(crate) fn abandon_match(&mut self, leaver: PlayerId) {
        let Some(pending) = self.matches.take(leaver) else {
            return;
        };
        let (survivor, message) = if pending.target == leaver {
            (pending.requester, "Your request was rejected.")
        } else {
            (pending.target, "Player has aborted the request.")
        };
        debug!(%leaver, %survivor, "Pending match abandoned");
        self.send(
            survivor,
            ServerMessage::MatchingResponse {
                accepted: false,
                message: message.to_string(),
            },
        );
    }
}
