//! Win detection.

use crate::board::Board;
use crate::types::{Cell, Coord, Mark};
use tracing::instrument;

/// Returns the mark owning every cell of `line`, if there is one.
///
/// An empty line or one containing an empty cell never wins.
pub fn line_winner(board: &Board, line: &[Coord]) -> Option<Mark> {
    let (first, rest) = line.split_first()?;
    let mark = board.get(*first).and_then(Cell::mark)?;
    rest.iter()
        .all(|c| board.get(*c) == Some(Cell::Marked(mark)))
        .then_some(mark)
}

/// Checks only the lines through `last`: its row, its column and any
/// diagonal it lies on. O(N) per move.
#[instrument(skip(board), fields(size = board.size()))]
pub fn winner_through(board: &Board, last: Coord) -> Option<Mark> {
    board
        .lines_through(last)
        .iter()
        .find_map(|line| line_winner(board, line))
}
