//! Core vocabulary for the grid game.

use serde::{Deserialize, Serialize};

use crate::error::GameFault;

/// One of the two marks a player places on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// Moves first.
    X,
    /// Moves second.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Marked(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }

    /// True when nothing has been placed here.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Zero-based board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row, counted from the top.
    pub row: usize,
    /// Column, counted from the left.
    pub col: usize,
}

impl Coord {
    /// Creates a zero-based coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Converts 1-indexed protocol coordinates into a board coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`GameFault::OutOfBounds`] when either value falls outside `[1, size]`.
    pub fn from_one_based(row: i64, col: i64, size: usize) -> Result<Self, GameFault> {
        let fits = |v: i64| v >= 1 && usize::try_from(v).is_ok_and(|v| v <= size);
        if !fits(row) || !fits(col) {
            return Err(GameFault::OutOfBounds { row, col, size });
        }
        // Both values are in [1, size] here.
        Ok(Self::new(row as usize - 1, col as usize - 1))
    }

    /// Lies on the top-left to bottom-right diagonal.
    pub fn on_main_diagonal(self) -> bool {
        self.row == self.col
    }

    /// Lies on the top-right to bottom-left diagonal of a `size` board.
    pub fn on_anti_diagonal(self, size: usize) -> bool {
        self.row + self.col + 1 == size
    }
}

/// Which player holds which mark, fixed when a game is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seats<P> {
    /// Player placing X.
    pub x: P,
    /// Player placing O.
    pub o: P,
}

impl<P: Copy + PartialEq> Seats<P> {
    /// Creates a seat assignment.
    pub fn new(x: P, o: P) -> Self {
        Self { x, o }
    }

    /// Player holding `mark`.
    pub fn player(&self, mark: Mark) -> P {
        match mark {
            Mark::X => self.x,
            Mark::O => self.o,
        }
    }

    /// Mark held by `player`, or `None` if they are not seated.
    pub fn mark_of(&self, player: P) -> Option<Mark> {
        if player == self.x {
            Some(Mark::X)
        } else if player == self.o {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// The seated player other than `player`.
    pub fn other(&self, player: P) -> Option<P> {
        self.mark_of(player).map(|mark| self.player(mark.opponent()))
    }
}
