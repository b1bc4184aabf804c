//! Draw and game-termination detection tests.

use crate::board::{Board, GameResult, GameResultReason};

#[test]
fn test_insufficient_material_kings_only() {
    let board: Board = "8/8/4k3/8/8/2K5/8/8 w - - 0 1".parse().unwrap();
    assert!(board.is_insufficient_material());
    assert_eq!(
        board.is_game_over(),
        Some((GameResultReason::InsufficientMaterial, GameResult::Draw))
    );
}

#[test]
fn test_insufficient_material_single_minor() {
    let knight: Board = "8/8/4k3/8/5N2/2K5/8/8 w - - 0 1".parse().unwrap();
    assert!(knight.is_insufficient_material());

    let bishop: Board = "8/8/4k3/8/5b2/2K5/8/8 w - - 0 1".parse().unwrap();
    assert!(bishop.is_insufficient_material());
}

#[test]
fn test_insufficient_material_same_color_bishops() {
    // Both bishops on light squares.
    let drawn: Board = "8/3b4/4k3/8/8/2KB4/8/8 w - - 0 1".parse().unwrap();
    assert!(drawn.is_insufficient_material());

    // Opposite-colored bishops can still mate.
    let live: Board = "8/4b3/4k3/8/8/2KB4/8/8 w - - 0 1".parse().unwrap();
    assert!(!live.is_insufficient_material());
}

#[test]
fn test_sufficient_material() {
    assert!(!Board::new().is_insufficient_material());

    let rook: Board = "8/8/4k3/8/8/2KR4/8/8 w - - 0 1".parse().unwrap();
    assert!(!rook.is_insufficient_material());

    let pawn: Board = "8/8/4k3/8/8/2KP4/8/8 w - - 0 1".parse().unwrap();
    assert!(!pawn.is_insufficient_material());
}

#[test]
fn test_halfmove_draw() {
    let board: Board = "8/8/4k3/8/8/2KR4/8/8 w - - 100 80".parse().unwrap();
    assert!(board.is_halfmove_draw());
    assert_eq!(
        board.halfmove_draw_type(),
        (GameResultReason::FiftyMoveRule, GameResult::Draw)
    );
    assert_eq!(
        board.is_game_over(),
        Some((GameResultReason::FiftyMoveRule, GameResult::Draw))
    );

    let board: Board = "8/8/4k3/8/8/2KR4/8/8 w - - 99 80".parse().unwrap();
    assert!(!board.is_halfmove_draw());
}

#[test]
fn test_halfmove_draw_checkmate_priority() {
    // Back-rank mate delivered exactly on the hundredth halfmove.
    let board: Board = "6k1/5ppp/8/8/8/8/8/4R1K1 w - - 99 80".parse().unwrap();
    let mut board = board;
    board.make_move(board.parse_move("e1e8").unwrap());

    assert!(board.is_halfmove_draw());
    assert_eq!(
        board.halfmove_draw_type(),
        (GameResultReason::Checkmate, GameResult::Lose)
    );
}

#[test]
fn test_checkmate() {
    // Fool's mate.
    let mut board = Board::new();
    for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        board.make_move(board.parse_move(mv).unwrap());
    }

    assert!(board.in_check());
    assert!(board.legal_moves().is_empty());
    assert_eq!(
        board.is_game_over(),
        Some((GameResultReason::Checkmate, GameResult::Lose))
    );
}

#[test]
fn test_stalemate() {
    let board: Board = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
    assert!(!board.in_check());
    assert!(board.legal_moves().is_empty());
    assert_eq!(
        board.is_game_over(),
        Some((GameResultReason::Stalemate, GameResult::Draw))
    );
}

#[test]
fn test_threefold_repetition() {
    let mut board = Board::new();

    // Shuffle the knights out and back twice.
    for mv in [
        "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
    ] {
        board.make_move(board.parse_move(mv).unwrap());
    }

    assert!(board.is_repetition(2));
    assert_eq!(
        board.is_game_over(),
        Some((GameResultReason::ThreefoldRepetition, GameResult::Draw))
    );
}

#[test]
fn test_twofold_is_not_threefold() {
    let mut board = Board::new();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        board.make_move(board.parse_move(mv).unwrap());
    }

    assert!(board.is_repetition(1));
    assert!(!board.is_repetition(2));
    assert_eq!(board.is_game_over(), None);
}

#[test]
fn test_game_not_over_at_start() {
    assert_eq!(Board::new().is_game_over(), None);
}
