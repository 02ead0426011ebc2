//! Faults raised by the game engine.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Stable tag for a [`GameFault`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultKind {
    /// Coordinate outside the grid.
    OutOfBounds,
    /// Target cell already holds a mark.
    UsedCell,
    /// Mover is seated but it is the other mark's turn.
    WrongTurn,
    /// Mover is not part of this game.
    NotSeated,
    /// The game already has a result.
    GameOver,
}

/// A rejected move. The game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameFault {
    /// Row or column outside `[1, size]`.
    #[display("Invalid coordinates for a {size}x{size} grid")]
    OutOfBounds {
        /// Requested row, 1-indexed.
        row: i64,
        /// Requested column, 1-indexed.
        col: i64,
        /// Board edge length.
        size: usize,
    },
    /// The cell is already marked.
    #[display("Can't play a move on a non-empty cell!")]
    CellOccupied {
        /// Row, 1-indexed.
        row: usize,
        /// Column, 1-indexed.
        col: usize,
    },
    /// It is the other player's turn.
    #[display("It's not your turn!")]
    NotYourTurn,
    /// The mover holds no seat in this game.
    #[display("You are not playing in this game!")]
    NotSeated,
    /// The game is already decided.
    #[display("The game is already over!")]
    GameOver,
}

impl GameFault {
    /// Returns the stable tag for this fault.
    pub fn kind(&self) -> FaultKind {
        match self {
            GameFault::OutOfBounds { .. } => FaultKind::OutOfBounds,
            GameFault::CellOccupied { .. } => FaultKind::UsedCell,
            GameFault::NotYourTurn => FaultKind::WrongTurn,
            GameFault::NotSeated => FaultKind::NotSeated,
            GameFault::GameOver => FaultKind::GameOver,
        }
    }
}
