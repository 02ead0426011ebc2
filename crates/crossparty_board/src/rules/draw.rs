//! Draw detection.

use crate::board::Board;
use tracing::instrument;

/// True when `move_count` has filled the board.
///
/// Only meaningful after every win check for the last move has failed.
#[instrument(skip(board), fields(size = board.size()))]
pub fn is_draw(board: &Board, move_count: usize) -> bool {
    move_count >= board.capacity()
}
