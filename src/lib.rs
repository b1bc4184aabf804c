// Crate root - export modules
pub mod board;
pub mod pgn;

mod zobrist;
