//! Scenario tests for the board engine.

use crossparty_board::{Cell, Coord, FaultKind, Game, GameFault, GameStatus, Mark, Seats, rules};

const A: u64 = 1;
const B: u64 = 2;

fn play(game: &mut Game<u64>, moves: &[(u64, i64, i64)]) -> GameStatus {
    let mut status = GameStatus::InProgress;
    for &(player, row, col) in moves {
        status = game.apply_move(player, row, col).expect("Valid move");
    }
    status
}

#[test]
fn test_top_row_win() {
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[(A, 1, 1), (B, 2, 1), (A, 1, 2), (B, 2, 2), (A, 1, 3)],
    );
    assert_eq!(status, GameStatus::Won(Mark::X));
    assert!(game.is_finished());
    assert_eq!(game.move_count(), 5);
}

#[test]
fn test_column_win_for_o() {
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[(A, 1, 1), (B, 1, 3), (A, 2, 1), (B, 2, 3), (A, 3, 2), (B, 3, 3)],
    );
    assert_eq!(status, GameStatus::Won(Mark::O));
}

#[test]
fn test_diagonal_wins() {
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[(A, 1, 1), (B, 1, 2), (A, 2, 2), (B, 1, 3), (A, 3, 3)],
    );
    assert_eq!(status, GameStatus::Won(Mark::X));

    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[(A, 1, 3), (B, 1, 1), (A, 2, 2), (B, 1, 2), (A, 3, 1)],
    );
    assert_eq!(status, GameStatus::Won(Mark::X));
}

#[test]
fn test_full_board_draw() {
    // X O X / O O X / X X O
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[
            (A, 1, 1),
            (B, 2, 2),
            (A, 1, 3),
            (B, 1, 2),
            (A, 3, 2),
            (B, 2, 1),
            (A, 2, 3),
            (B, 3, 3),
            (A, 3, 1),
        ],
    );
    assert_eq!(status, GameStatus::Draw);
    assert!(game.board().is_full());
    assert_eq!(game.apply_move(B, 1, 1), Err(GameFault::GameOver));
}

#[test]
fn test_diagonal_on_ninth_move_beats_draw() {
    // X holds (1,1) (1,3) (2,2) (3,2) (3,3); the last mark closes the main diagonal.
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[
            (A, 1, 1),
            (B, 1, 2),
            (A, 1, 3),
            (B, 2, 1),
            (A, 2, 2),
            (B, 2, 3),
            (A, 3, 2),
            (B, 3, 1),
            (A, 3, 3),
        ],
    );
    assert_eq!(status, GameStatus::Won(Mark::X));
}

#[test]
fn test_ninth_move_outcomes() {
    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[
            (A, 1, 1),
            (B, 1, 2),
            (A, 1, 3),
            (B, 2, 2),
            (A, 2, 1),
            (B, 3, 1),
            (A, 2, 3),
            (B, 3, 3),
            (A, 3, 2),
        ],
    );
    // Final board: X O X / X O X / O X O -> no line, draw.
    assert_eq!(status, GameStatus::Draw);

    let mut game = Game::new(Seats::new(A, B));
    let status = play(
        &mut game,
        &[
            (A, 1, 1),
            (B, 1, 2),
            (A, 1, 3),
            (B, 2, 2),
            (A, 2, 1),
            (B, 2, 3),
            (A, 3, 2),
            (B, 3, 3),
            (A, 3, 1),
        ],
    );
    // Ninth move completes column 1 for X.
    assert_eq!(status, GameStatus::Won(Mark::X));
}

#[test]
fn test_out_of_bounds_leaves_board_unchanged() {
    let mut game = Game::new(Seats::new(A, B));
    let fault = game.apply_move(A, 4, 1).expect_err("Row 4 is off the board");
    assert_eq!(
        fault,
        GameFault::OutOfBounds {
            row: 4,
            col: 1,
            size: 3
        }
    );
    assert_eq!(fault.kind(), FaultKind::OutOfBounds);
    assert_eq!(fault.to_string(), "Invalid coordinates for a 3x3 grid");
    assert_eq!(game.move_count(), 0);
    assert!(game.board().cells().iter().all(|c| *c == Cell::Empty));
    assert_eq!(game.current_player(), A);
}

#[test]
fn test_occupied_cell_fault() {
    let mut game = Game::new(Seats::new(A, B));
    game.apply_move(A, 2, 2).expect("Valid move");
    let fault = game.apply_move(B, 2, 2).expect_err("Cell is taken");
    assert_eq!(fault.kind(), FaultKind::UsedCell);
    assert_eq!(fault.to_string(), "Can't play a move on a non-empty cell!");
    assert_eq!(game.current_player(), B);
}

#[test]
fn test_further_moves_fault_after_result() {
    let mut game = Game::new(Seats::new(A, B));
    play(
        &mut game,
        &[(A, 1, 1), (B, 2, 1), (A, 1, 2), (B, 2, 2), (A, 1, 3)],
    );
    for player in [A, B] {
        assert_eq!(game.apply_move(player, 3, 3), Err(GameFault::GameOver));
    }
    assert_eq!(game.status(), GameStatus::Won(Mark::X));
    assert_eq!(game.board().get(Coord::new(2, 2)), Some(Cell::Empty));
}

#[test]
fn test_no_result_before_minimum_moves() {
    let mut game = Game::new(Seats::new(A, B));
    let moves = [(A, 1, 1), (B, 3, 3), (A, 1, 2), (B, 3, 2)];
    for (k, &(player, row, col)) in moves.iter().enumerate() {
        assert!(rules::too_early_to_win(k + 1, 3));
        assert_eq!(
            game.apply_move(player, row, col),
            Ok(GameStatus::InProgress)
        );
    }
    assert_eq!(game.move_count() + 1, rules::min_moves_for_win(3));
}

#[test]
fn test_four_by_four_board() {
    let mut game = Game::with_size(Seats::new(A, B), 4);
    let status = play(
        &mut game,
        &[
            (A, 1, 1),
            (B, 2, 1),
            (A, 1, 2),
            (B, 2, 2),
            (A, 1, 3),
            (B, 2, 3),
        ],
    );
    assert_eq!(status, GameStatus::InProgress);
    assert_eq!(game.apply_move(A, 1, 4), Ok(GameStatus::Won(Mark::X)));
    assert!(matches!(
        Game::with_size(Seats::new(A, B), 4).apply_move(A, 5, 1),
        Err(GameFault::OutOfBounds { size: 4, .. })
    ));
}
