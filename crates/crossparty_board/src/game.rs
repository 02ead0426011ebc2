//! Game engine: move application, turn order, and result tracking.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::error::GameFault;
use crate::rules;
use crate::types::{Coord, Mark, Seats};

/// Outcome of the game so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are still being accepted.
    InProgress,
    /// A mark completed a line.
    Won(Mark),
    /// The board filled with no complete line.
    Draw,
}

impl GameStatus {
    /// True once the game has a result.
    pub fn is_finished(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// One game between two seated players.
///
/// `P` identifies a player; the engine only compares it for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game<P> {
    board: Board,
    move_count: usize,
    seats: Seats<P>,
    last_move: Option<Coord>,
    status: GameStatus,
}

impl<P: Copy + PartialEq + std::fmt::Debug> Game<P> {
    /// Creates a 3×3 game.
    pub fn new(seats: Seats<P>) -> Self {
        Self::with_board(seats, Board::new())
    }

    /// Creates a `size`×`size` game.
    pub fn with_size(seats: Seats<P>, size: usize) -> Self {
        Self::with_board(seats, Board::with_size(size))
    }

    fn with_board(seats: Seats<P>, board: Board) -> Self {
        Self {
            board,
            move_count: 0,
            seats,
            last_move: None,
            status: GameStatus::InProgress,
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Marks placed so far.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Seat assignment.
    pub fn seats(&self) -> &Seats<P> {
        &self.seats
    }

    /// Most recently placed cell.
    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    /// Result so far.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True once the game has a result.
    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Mark to move: X after an even number of moves, O after an odd one.
    pub fn current_mark(&self) -> Mark {
        if self.move_count % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    /// Player to move.
    pub fn current_player(&self) -> P {
        self.seats.player(self.current_mark())
    }

    /// Places the mover's mark at 1-indexed (`row`, `col`).
    ///
    /// The engine re-derives whose turn it is from the move count and will
    /// not trust the caller's check.
    ///
    /// # Errors
    ///
    /// - [`GameFault::GameOver`] once a result is set
    /// - [`GameFault::NotSeated`] if `player` holds no mark
    /// - [`GameFault::NotYourTurn`] if the other mark is to move
    /// - [`GameFault::OutOfBounds`] if either coordinate is outside `[1, N]`
    /// - [`GameFault::CellOccupied`] if the cell already holds a mark
    #[instrument(skip(self), fields(move_count = self.move_count))]
    pub fn apply_move(&mut self, player: P, row: i64, col: i64) -> Result<GameStatus, GameFault> {
        if self.status.is_finished() {
            return Err(GameFault::GameOver);
        }

        let mark = self.seats.mark_of(player).ok_or(GameFault::NotSeated)?;
        if mark != self.current_mark() {
            return Err(GameFault::NotYourTurn);
        }

        let coord = Coord::from_one_based(row, col, self.board.size())?;
        if self.board.get(coord).is_some_and(|c| !c.is_empty()) {
            return Err(GameFault::CellOccupied {
                row: coord.row + 1,
                col: coord.col + 1,
            });
        }

        self.board.place(coord, mark);
        self.move_count += 1;
        self.last_move = Some(coord);
        self.status = self.evaluate(coord);

        debug!(?mark, ?coord, status = ?self.status, "Move applied");
        if self.status.is_finished() {
            info!(status = ?self.status, moves = self.move_count, "Game concluded");
        }
        Ok(self.status)
    }

    /// Result after a mark landed on `last`.
    fn evaluate(&self, last: Coord) -> GameStatus {
        let size = self.board.size();
        if rules::too_early_to_win(self.move_count, size) {
            return GameStatus::InProgress;
        }
        if let Some(mark) = rules::winner_through(&self.board, last) {
            return GameStatus::Won(mark);
        }
        if rules::is_draw(&self.board, self.move_count) {
            return GameStatus::Draw;
        }
        GameStatus::InProgress
    }

    /// Renders the board with the last move highlighted.
    pub fn render(&self) -> String {
        self.board.render(self.last_move)
    }
}
