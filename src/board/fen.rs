//! Position parsing and rendering: FEN and EPD.

use std::str::FromStr;

use super::error::FenError;
use super::types::{file_to_index, CastlingSide, Color, Piece, PieceType, Square};
use super::Board;

impl Board {
    /// Parse a position from FEN. The board is cleared first; on error the
    /// partially loaded state is unusable and the caller should re-set a
    /// valid position.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let chess960 = self.chess960;
        let original = fen.trim().to_string();

        *self = Board::cleared();
        self.chess960 = chess960;
        self.original_fen = original;

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            #[cfg(feature = "logging")]
            log::debug!("rejecting FEN with {} fields: {fen:?}", parts.len());
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        self.half_moves = if parts.len() > 4 {
            parts[4].parse().unwrap_or(0)
        } else {
            0
        };

        // The full-move counter folds into the ply count; a full-move
        // number of 0 saturates rather than wrapping.
        let full_moves: u16 = if parts.len() > 5 {
            parts[5].parse().unwrap_or(1)
        } else {
            1
        };
        self.plies_played = full_moves.saturating_mul(2).saturating_sub(2);

        self.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if self.side_to_move == Color::Black {
            self.plies_played += 1;
        }

        // Piece placement, rank 8 down to rank 1.
        let mut sq = 56i32;
        for c in parts[0].chars() {
            if c == '/' {
                sq -= 16;
            } else if let Some(digit) = c.to_digit(10) {
                sq += digit as i32;
            } else if let Some(piece) = Piece::from_fen_char(c) {
                if !(0..64).contains(&sq) {
                    return Err(FenError::TooManySquares);
                }
                self.place_piece(piece, Square::from_index(sq as usize));
                sq += 1;
            } else {
                return Err(FenError::InvalidPiece { char: c });
            }
        }

        self.parse_castling_field(parts[2])?;

        self.en_passant = match parts[3] {
            "-" => None,
            text => Some(
                Square::from_str(text).map_err(|_| FenError::InvalidEnPassant {
                    found: text.to_string(),
                })?,
            ),
        };

        self.hash = self.recompute_zobrist();
        self.history.clear();
        self.history.reserve(150);

        Ok(())
    }

    fn parse_castling_field(&mut self, field: &str) -> Result<(), FenError> {
        self.castling.clear_all();

        for c in field.chars() {
            if c == '-' {
                break;
            }

            if !self.chess960 {
                match c {
                    'K' => self.castling.set(Color::White, CastlingSide::King, 7),
                    'Q' => self.castling.set(Color::White, CastlingSide::Queen, 0),
                    'k' => self.castling.set(Color::Black, CastlingSide::King, 7),
                    'q' => self.castling.set(Color::Black, CastlingSide::Queen, 0),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
                continue;
            }

            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            if self.pieces(PieceType::King, color).is_empty() {
                return Err(FenError::InvalidCastling { char: c });
            }
            let king_sq = self.king_sq(color);

            match c.to_ascii_lowercase() {
                // Shorthand: scan from the king toward the corner for the
                // nearest rook of the same color.
                'k' => {
                    for file in king_sq.file() + 1..8 {
                        let sq = Square::new(king_sq.rank(), file);
                        if self.at(sq) == Some(Piece::new(PieceType::Rook, color)) {
                            self.castling.set(color, CastlingSide::King, file);
                            break;
                        }
                    }
                }
                'q' => {
                    for file in (0..king_sq.file()).rev() {
                        let sq = Square::new(king_sq.rank(), file);
                        if self.at(sq) == Some(Piece::new(PieceType::Rook, color)) {
                            self.castling.set(color, CastlingSide::Queen, file);
                            break;
                        }
                    }
                }
                'a'..='h' => {
                    let file = file_to_index(c.to_ascii_lowercase());
                    let side = if file > king_sq.file() {
                        CastlingSide::King
                    } else {
                        CastlingSide::Queen
                    };
                    self.castling.set(color, side, file);
                }
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        Ok(())
    }

    /// Render the position as FEN. The half-move and full-move counters
    /// are omitted when `include_counters` is false.
    #[must_use]
    pub fn get_fen(&self, include_counters: bool) -> String {
        let mut fen = String::with_capacity(100);

        for rank in (0..8).rev() {
            let mut free = 0;
            for file in 0..8 {
                match self.at(Square::new(rank, file)) {
                    Some(piece) => {
                        if free > 0 {
                            fen.push_str(&free.to_string());
                            free = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => free += 1,
                }
            }
            if free > 0 {
                fen.push_str(&free.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push_str(&self.side_to_move.to_string());
        fen.push(' ');

        let castle = self.castle_string();
        if castle.is_empty() {
            fen.push('-');
        } else {
            fen.push_str(&castle);
        }

        match self.en_passant {
            Some(sq) => {
                fen.push(' ');
                fen.push_str(&sq.to_string());
            }
            None => fen.push_str(" -"),
        }

        if include_counters {
            fen.push(' ');
            fen.push_str(&self.half_move_clock().to_string());
            fen.push(' ');
            fen.push_str(&self.full_move_number().to_string());
        }

        fen
    }

    /// The castling field: `KQkq`-style letters in standard chess, rook
    /// file letters in Chess960 (uppercase for White). Empty when no right
    /// is held.
    #[must_use]
    pub(crate) fn castle_string(&self) -> String {
        let mut s = String::new();

        if self.chess960 {
            for (color, side) in [
                (Color::White, CastlingSide::King),
                (Color::White, CastlingSide::Queen),
                (Color::Black, CastlingSide::King),
                (Color::Black, CastlingSide::Queen),
            ] {
                if let Some(file) = self.castling.rook_file(color, side) {
                    let base = if color == Color::White { b'A' } else { b'a' };
                    s.push((base + file as u8) as char);
                }
            }
        } else {
            if self.castling.has(Color::White, CastlingSide::King) {
                s.push('K');
            }
            if self.castling.has(Color::White, CastlingSide::Queen) {
                s.push('Q');
            }
            if self.castling.has(Color::Black, CastlingSide::King) {
                s.push('k');
            }
            if self.castling.has(Color::Black, CastlingSide::Queen) {
                s.push('q');
            }
        }

        s
    }

    /// Parse an extended position description: the four FEN fields
    /// followed by semicolon-separated operations, of which `hmvc` and
    /// `fmvn` supply the counters.
    pub fn set_epd(&mut self, epd: &str) -> Result<(), FenError> {
        let parts: Vec<&str> = epd.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut half_moves = 0u32;
        let mut full_moves = 1u32;

        for op in epd
            .splitn(5, char::is_whitespace)
            .nth(4)
            .unwrap_or("")
            .split(';')
        {
            let mut words = op.split_whitespace();
            match (words.next(), words.next()) {
                (Some("hmvc"), Some(value)) => half_moves = value.parse().unwrap_or(0),
                (Some("fmvn"), Some(value)) => full_moves = value.parse().unwrap_or(1),
                _ => {}
            }
        }

        let fen = format!(
            "{} {} {} {} {} {}",
            parts[0], parts[1], parts[2], parts[3], half_moves, full_moves
        );
        self.set_fen(&fen)
    }

    /// Render the position as an EPD record with `hmvc` and `fmvn`
    /// operations.
    #[must_use]
    pub fn get_epd(&self) -> String {
        format!(
            "{} hmvc {}; fmvn {};",
            self.get_fen(false),
            self.half_move_clock(),
            self.full_move_number()
        )
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::cleared();
        board.set_fen(s)?;
        Ok(board)
    }
}
