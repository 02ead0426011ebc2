//! Game rules for the grid game.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! the engine so they can be tested on hand-built boards.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{line_winner, winner_through};

/// Smallest move count at which a line can be complete on a `size` board.
///
/// A line needs `size` marks from one player, who has placed
/// `ceil(moves / 2)` marks after `moves` moves.
pub fn min_moves_for_win(size: usize) -> usize {
    (2 * size).saturating_sub(1)
}

/// True when no line can be complete yet after `move_count` moves.
pub fn too_early_to_win(move_count: usize, size: usize) -> bool {
    move_count.div_ceil(2) < size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_gate_on_three_by_three() {
        assert_eq!(min_moves_for_win(3), 5);
        for moves in 0..5 {
            assert!(too_early_to_win(moves, 3), "moves = {moves}");
        }
        assert!(!too_early_to_win(5, 3));
        assert!(!too_early_to_win(9, 3));
    }

    #[test]
    fn test_gate_matches_minimum() {
        for size in 1..7 {
            let min = min_moves_for_win(size);
            assert!(!too_early_to_win(min, size));
            if min > 0 {
                assert!(too_early_to_win(min - 1, size));
            }
        }
    }
}
