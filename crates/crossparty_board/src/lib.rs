//! Crossparty board engine.
//!
//! Pure, synchronous game logic for one two-player grid game: move
//! validation, turn order derived from the move count, and win detection
//! restricted to the lines through the last move.
//!
//! # Example
//!
//! ```
//! use crossparty_board::{Game, GameStatus, Mark, Seats};
//!
//! let mut game = Game::new(Seats::new("alice", "bob"));
//! for (player, row, col) in [
//!     ("alice", 1, 1),
//!     ("bob", 2, 1),
//!     ("alice", 1, 2),
//!     ("bob", 2, 2),
//! ] {
//!     game.apply_move(player, row, col).unwrap();
//! }
//! assert_eq!(game.apply_move("alice", 1, 3), Ok(GameStatus::Won(Mark::X)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod game;
pub mod rules;
mod types;

pub use board::{Board, DEFAULT_SIZE};
pub use error::{FaultKind, GameFault};
pub use game::{Game, GameStatus};
pub use types::{Cell, Coord, Mark, Seats};
