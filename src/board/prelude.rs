//! Convenience re-exports for typical users of the board API.

pub use super::{
    Board, Color, GameResult, GameResultReason, Move, MoveGenType, MoveList, MoveType, Piece,
    PieceSet, PieceType, Square,
};
