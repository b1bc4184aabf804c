//! FEN and EPD parsing/rendering tests.

use crate::board::{Board, CastlingSide, Color, FenError, PieceType, Square, START_FEN};

#[test]
fn test_start_position_round_trip() {
    let board = Board::new();
    assert_eq!(board.get_fen(true), START_FEN);
    assert_eq!(
        board.get_fen(false),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
    );
}

#[test]
fn test_fen_round_trips() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "8/P7/8/8/8/8/8/K1k5 w - - 12 70",
        "r3k2r/8/8/8/8/8/8/R3K2R b Qk - 3 20",
    ];
    for fen in fens {
        let board: Board = fen.parse().unwrap();
        assert_eq!(board.get_fen(true), fen);
    }
}

#[test]
fn test_fen_missing_counters_default() {
    let board: Board = "8/8/4k3/8/8/2KR4/8/8 w - -".parse().unwrap();
    assert_eq!(board.half_move_clock(), 0);
    assert_eq!(board.full_move_number(), 1);
}

#[test]
fn test_fen_side_and_ply_counters() {
    let board: Board = "8/8/4k3/8/8/2KR4/8/8 b - - 7 42".parse().unwrap();
    assert_eq!(board.side_to_move(), Color::Black);
    assert_eq!(board.half_move_clock(), 7);
    assert_eq!(board.full_move_number(), 42);
}

#[test]
fn test_fen_errors() {
    let mut board = Board::new();
    assert!(matches!(
        board.set_fen("8/8/8/8"),
        Err(FenError::TooFewParts { found: 1 })
    ));
    assert!(matches!(
        board.set_fen("8/8/4k3/8/8/2KR4/8/8 x - -"),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(matches!(
        board.set_fen("8/8/4x3/8/8/2KR4/8/8 w - -"),
        Err(FenError::InvalidPiece { char: 'x' })
    ));
    assert!(matches!(
        board.set_fen("8/8/4k3/8/8/2KR4/8/8 w - e9"),
        Err(FenError::InvalidEnPassant { .. })
    ));
}

#[test]
fn test_castling_field_partial_rights() {
    let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1".parse().unwrap();
    let rights = board.castling_rights();
    assert!(rights.has(Color::White, CastlingSide::King));
    assert!(!rights.has(Color::White, CastlingSide::Queen));
    assert!(!rights.has(Color::Black, CastlingSide::King));
    assert!(rights.has(Color::Black, CastlingSide::Queen));
    assert_eq!(board.get_fen(false), "r3k2r/8/8/8/8/8/8/R3K2R w Kq -");
}

#[test]
fn test_chess960_castling_file_letters() {
    let mut board = Board::new();
    board.set_chess960(true);
    board
        .set_fen("1rqbkrbn/1ppppp1p/1n6/p1N3p1/8/2P4P/PP1PPPP1/1RQBKRBN w FBfb - 0 9")
        .unwrap();

    let rights = board.castling_rights();
    assert_eq!(rights.rook_file(Color::White, CastlingSide::King), Some(5));
    assert_eq!(rights.rook_file(Color::White, CastlingSide::Queen), Some(1));
    assert_eq!(rights.rook_file(Color::Black, CastlingSide::King), Some(5));
    assert_eq!(rights.rook_file(Color::Black, CastlingSide::Queen), Some(1));

    assert_eq!(
        board.get_fen(true),
        "1rqbkrbn/1ppppp1p/1n6/p1N3p1/8/2P4P/PP1PPPP1/1RQBKRBN w FBfb - 0 9"
    );
}

#[test]
fn test_chess960_shorthand_resolves_to_rook_file() {
    let mut board = Board::new();
    board.set_chess960(true);
    board
        .set_fen("1rqbkrbn/1ppppp1p/1n6/p1N3p1/8/2P4P/PP1PPPP1/1RQBKRBN w KQkq - 0 9")
        .unwrap();

    let rights = board.castling_rights();
    assert_eq!(rights.rook_file(Color::White, CastlingSide::King), Some(5));
    assert_eq!(rights.rook_file(Color::White, CastlingSide::Queen), Some(1));
    assert_eq!(rights.rook_file(Color::Black, CastlingSide::Queen), Some(1));
}

#[test]
fn test_set_chess960_reinterprets_position() {
    let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
    assert_eq!(board.get_fen(false), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq -");

    board.set_chess960(true);
    assert!(board.chess960());
    assert_eq!(board.get_fen(false), "r3k2r/8/8/8/8/8/8/R3K2R w HAha -");
}

#[test]
fn test_board_display_mentions_state() {
    let board = Board::new();
    let text = board.to_string();
    assert!(text.contains("Side to move: w"));
    assert!(text.contains("Castling rights: KQkq"));
}

#[test]
fn test_epd_round_trip() {
    let mut board = Board::new();
    board
        .set_epd("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - hmvc 12; fmvn 30;")
        .unwrap();
    assert_eq!(board.half_move_clock(), 12);
    assert_eq!(board.full_move_number(), 30);
    assert_eq!(board.get_epd(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - hmvc 12; fmvn 30;");
}

#[test]
fn test_epd_defaults() {
    let mut board = Board::new();
    board.set_epd("8/8/4k3/8/8/2KR4/8/8 w - -").unwrap();
    assert_eq!(board.half_move_clock(), 0);
    assert_eq!(board.full_move_number(), 1);
}

#[test]
fn test_mailbox_agrees_with_bitboards() {
    let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
        .parse()
        .unwrap();

    for idx in 0..64 {
        let sq = Square::from_index(idx);
        match board.at(sq) {
            Some(piece) => {
                assert!(board.pieces(piece.kind(), piece.color()).contains(sq));
            }
            None => assert!(!board.occ().contains(sq)),
        }
    }

    assert_eq!(board.pieces(PieceType::King, Color::White).popcount(), 1);
    assert_eq!(board.pieces(PieceType::King, Color::Black).popcount(), 1);
}
