//! UCI long algebraic notation: `e2e4`, `e7e8q`.

use std::str::FromStr;

use super::error::MoveParseError;
use super::types::{Move, MoveType, Piece, PieceType, Square};
use super::Board;

impl Board {
    /// Render a move in UCI long algebraic notation. Castling is written
    /// as the king's standard destination unless the board is in Chess960
    /// mode, where it stays king-takes-rook.
    #[must_use]
    pub fn move_to_uci(&self, mv: Move) -> String {
        let from = mv.from();
        let mut to = mv.to();

        if !self.chess960() && mv.type_of() == MoveType::Castling {
            let file = if to > from { 6 } else { 2 };
            to = Square::new(from.rank(), file);
        }

        let mut text = format!("{from}{to}");
        if mv.type_of() == MoveType::Promotion {
            text.push(mv.promotion_type().to_char());
        }
        text
    }

    /// Parse a move in UCI long algebraic notation against this position.
    ///
    /// The move is classified (castling, en passant, promotion) but not
    /// checked for full legality.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Board;
    ///
    /// let board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(board.move_to_uci(mv), "e2e4");
    /// ```
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        if !uci.is_ascii() {
            return Err(invalid_square());
        }
        let from = Square::from_str(&uci[0..2]).map_err(|_| invalid_square())?;
        let to = Square::from_str(&uci[2..4]).map_err(|_| invalid_square())?;

        let piece = self
            .at(from)
            .ok_or_else(|| MoveParseError::EmptySourceSquare {
                notation: uci.to_string(),
            })?;

        // Chess960 castling arrives as king-takes-own-rook.
        if self.chess960()
            && piece.kind() == PieceType::King
            && self.at(to).map(Piece::kind) == Some(PieceType::Rook)
            && self.at(to).map(Piece::color) == Some(self.side_to_move())
        {
            return Ok(Move::castling(from, to));
        }

        // Standard castling arrives as a two-file king step and is
        // rewritten onto the rook's corner square.
        if !self.chess960() && piece.kind() == PieceType::King && to.distance(from) == 2 {
            let corner = Square::new(from.rank(), if to > from { 7 } else { 0 });
            return Ok(Move::castling(from, corner));
        }

        if piece.kind() == PieceType::Pawn && Some(to) == self.en_passant_sq() {
            return Ok(Move::en_passant(from, to));
        }

        if uci.len() == 5 {
            let promo_char = uci.as_bytes()[4] as char;
            let promotion = PieceType::from_char(promo_char)
                .filter(|p| !matches!(p, PieceType::Pawn | PieceType::King))
                .ok_or(MoveParseError::InvalidPromotion { char: promo_char })?;
            if piece.kind() == PieceType::Pawn && to.back_rank(!self.side_to_move()) {
                return Ok(Move::promotion(from, to, promotion));
            }
            return Err(MoveParseError::InvalidPromotion { char: promo_char });
        }

        Ok(Move::normal(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_moves() {
        let board = Board::new();
        let mv = board.parse_move("e2e4").unwrap();
        assert_eq!(mv.from(), Square::new(1, 4));
        assert_eq!(mv.to(), Square::new(3, 4));
        assert_eq!(mv.type_of(), MoveType::Normal);
        assert_eq!(board.move_to_uci(mv), "e2e4");
    }

    #[test]
    fn test_parse_length_errors() {
        let board = Board::new();
        assert!(matches!(
            board.parse_move("e2e"),
            Err(MoveParseError::InvalidLength { len: 3 })
        ));
        assert!(matches!(
            board.parse_move("e2e4q1"),
            Err(MoveParseError::InvalidLength { len: 6 })
        ));
        assert!(matches!(
            board.parse_move("i9e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn test_standard_castling_rewritten_to_rook_square() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w KQkq - 0 1"
            .parse()
            .unwrap();
        let mv = board.parse_move("e1g1").unwrap();
        assert_eq!(mv.type_of(), MoveType::Castling);
        assert_eq!(mv.to(), Square::new(0, 7));
        assert_eq!(board.move_to_uci(mv), "e1g1");
    }

    #[test]
    fn test_chess960_king_takes_rook() {
        let mut board = Board::new();
        board.set_chess960(true);
        board
            .set_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQK2R w HAha - 0 1")
            .unwrap();
        let mv = board.parse_move("e1h1").unwrap();
        assert_eq!(mv.type_of(), MoveType::Castling);
        assert_eq!(board.move_to_uci(mv), "e1h1");
    }

    #[test]
    fn test_parse_en_passant() {
        let board: Board = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3"
            .parse()
            .unwrap();
        let mv = board.parse_move("e5f6").unwrap();
        assert_eq!(mv.type_of(), MoveType::EnPassant);
    }

    #[test]
    fn test_parse_promotion() {
        let board: Board = "8/P7/8/8/8/8/8/K1k5 w - - 0 1".parse().unwrap();
        let mv = board.parse_move("a7a8q").unwrap();
        assert_eq!(mv.type_of(), MoveType::Promotion);
        assert_eq!(mv.promotion_type(), PieceType::Queen);
        assert_eq!(board.move_to_uci(mv), "a7a8q");

        assert!(matches!(
            board.parse_move("a7a8x"),
            Err(MoveParseError::InvalidPromotion { .. })
        ));
    }
}
