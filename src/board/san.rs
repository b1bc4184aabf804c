//! Standard Algebraic Notation (SAN) and long algebraic notation.
//!
//! Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#", "Ne4d6".
//!
//! ```
//! use chess_core::board::Board;
//!
//! let board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! assert_eq!(board.move_to_san(mv), "e4");
//! ```

use super::error::SanError;
use super::movegen::{MoveGenType, PieceSet};
use super::types::{Move, MoveList, MoveType, Piece, PieceType, Square};
use super::Board;

#[derive(Default)]
struct SanInfo {
    piece: Option<PieceType>,
    from_file: Option<usize>,
    from_rank: Option<usize>,
    from: Option<Square>,
    to: Option<Square>,
    promotion: Option<PieceType>,
    castle_short: bool,
    castle_long: bool,
    capture: bool,
}

impl Board {
    /// Render a move in SAN with minimal disambiguation and a trailing
    /// `+`/`#` for check and checkmate.
    #[must_use]
    pub fn move_to_san(&self, mv: Move) -> String {
        self.move_to_rep(mv, false)
    }

    /// Render a move in long algebraic notation (always spelling out the
    /// from square, e.g. "Ng1f3").
    #[must_use]
    pub fn move_to_lan(&self, mv: Move) -> String {
        self.move_to_rep(mv, true)
    }

    fn move_to_rep(&self, mv: Move, long: bool) -> String {
        let mut san = String::new();

        if mv.type_of() == MoveType::Castling {
            san.push_str(if mv.to() > mv.from() { "O-O" } else { "O-O-O" });
        } else {
            let piece = self
                .at(mv.from())
                .map(Piece::kind)
                .expect("move origin holds a piece");

            if piece != PieceType::Pawn {
                san.push(piece.san_char());
            }

            if long {
                san.push_str(&mv.from().to_string());
            } else if piece != PieceType::Pawn {
                match self.disambiguation(mv, piece) {
                    (false, false) => {}
                    (true, false) => san.push((b'a' + mv.from().file() as u8) as char),
                    (false, true) => san.push((b'1' + mv.from().rank() as u8) as char),
                    (true, true) => san.push_str(&mv.from().to_string()),
                }
            }

            if self.is_capture(mv) {
                if piece == PieceType::Pawn && !long {
                    san.push((b'a' + mv.from().file() as u8) as char);
                }
                san.push('x');
            }

            san.push_str(&mv.to().to_string());

            if mv.type_of() == MoveType::Promotion {
                san.push('=');
                san.push(mv.promotion_type().san_char());
            }
        }

        let mut after = self.clone();
        after.make_move(mv);
        if after.in_check() {
            san.push(if after.legal_moves().is_empty() {
                '#'
            } else {
                '+'
            });
        }

        san
    }

    /// Which disambiguation `mv` needs among legal same-type moves to the
    /// same destination: (file, rank). Both set means the full square.
    fn disambiguation(&self, mv: Move, piece: PieceType) -> (bool, bool) {
        let mut rivals = Vec::new();
        for other in &self.legal_moves() {
            if *other != mv
                && other.type_of() != MoveType::Castling
                && other.to() == mv.to()
                && self.at(other.from()).map(Piece::kind) == Some(piece)
                && other.from() != mv.from()
            {
                rivals.push(*other);
            }
        }

        if rivals.is_empty() {
            return (false, false);
        }

        let file_taken = rivals
            .iter()
            .any(|m| m.from().file() == mv.from().file());
        let rank_taken = rivals
            .iter()
            .any(|m| m.from().rank() == mv.from().rank());

        match (file_taken, rank_taken) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Parse a SAN token against this position.
    ///
    /// Accepts castling as `O-O`/`O-O-O` or with zeros, and discards
    /// trailing `+`, `#`, `!`, `?` annotations. Exactly one legal move
    /// must match, otherwise the token is rejected as unknown or
    /// ambiguous.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let trimmed = san.trim().trim_end_matches(['+', '#', '!', '?']);
        if trimmed.is_empty() {
            return Err(SanError::Empty);
        }

        let info = parse_san_info(trimmed)?;

        let mut moves = MoveList::new();
        let mode = if info.capture {
            MoveGenType::Capture
        } else {
            MoveGenType::Quiet
        };
        let piece = info.piece.unwrap_or(PieceType::Pawn);
        self.legal_moves_into(&mut moves, mode, PieceSet::only(piece));

        if info.castle_short || info.castle_long {
            for mv in &moves {
                if mv.type_of() == MoveType::Castling
                    && ((info.castle_short && mv.to() > mv.from())
                        || (info.castle_long && mv.to() < mv.from()))
                {
                    return Ok(*mv);
                }
            }
            return Err(SanError::NoMatchingMove {
                san: san.to_string(),
            });
        }

        let to = info.to.ok_or_else(|| SanError::InvalidSquare {
            san: san.to_string(),
        })?;

        let mut matched = Move::NONE;
        let mut count = 0;

        for mv in &moves {
            if mv.to() != to || mv.type_of() == MoveType::Castling {
                continue;
            }

            let candidate = if let Some(promotion) = info.promotion {
                mv.type_of() == MoveType::Promotion
                    && mv.promotion_type() == promotion
                    && Some(mv.from().file()) == info.from_file
            } else if mv.type_of() == MoveType::Promotion {
                false
            } else if info.from_file.is_none() && info.from_rank.is_none() {
                true
            } else if mv.type_of() == MoveType::EnPassant {
                Some(mv.from().file()) == info.from_file
            } else if let Some(from) = info.from {
                mv.from() == from
            } else {
                Some(mv.from().file()) == info.from_file
                    || Some(mv.from().rank()) == info.from_rank
            };

            if candidate {
                matched = *mv;
                count += 1;
            }
        }

        match count {
            0 => Err(SanError::NoMatchingMove {
                san: san.to_string(),
            }),
            1 => Ok(matched),
            _ => Err(SanError::AmbiguousMove {
                san: san.to_string(),
            }),
        }
    }

    /// Parse a SAN token and make the move in one call.
    pub fn make_san_move(&mut self, san: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(san)?;
        self.make_move(mv);
        Ok(mv)
    }
}

fn parse_san_info(san: &str) -> Result<SanInfo, SanError> {
    let bytes = san.as_bytes();
    let mut info = SanInfo::default();

    let is_file = |c: u8| (b'a'..=b'h').contains(&c);
    let is_rank = |c: u8| (b'1'..=b'8').contains(&c);

    if bytes[0] == b'O' || bytes[0] == b'0' {
        info.piece = Some(PieceType::King);
        let castle_char = bytes[0];
        let rest = &bytes[3.min(bytes.len())..];

        info.castle_short = rest.is_empty() || rest[0] != b'-';
        info.castle_long = rest.len() >= 2 && rest[0] == b'-' && rest[1] == castle_char;
        if info.castle_long {
            info.castle_short = false;
        }
        return Ok(info);
    }

    let mut idx = 0;
    if is_file(bytes[0]) {
        info.piece = Some(PieceType::Pawn);
    } else {
        let c = bytes[0] as char;
        info.piece = Some(
            PieceType::from_char(c)
                .filter(|_| c.is_ascii_uppercase())
                .ok_or(SanError::InvalidPiece { char: c })?,
        );
        idx = 1;
    }

    let mut file_to = None;
    let mut rank_to = None;

    if idx < bytes.len() && is_file(bytes[idx]) {
        info.from_file = Some((bytes[idx] - b'a') as usize);
        idx += 1;
    }

    if idx < bytes.len() && is_rank(bytes[idx]) {
        info.from_rank = Some((bytes[idx] - b'1') as usize);
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'x' {
        info.capture = true;
        idx += 1;
    }

    if idx < bytes.len() && is_file(bytes[idx]) {
        file_to = Some((bytes[idx] - b'a') as usize);
        idx += 1;
    }

    if idx < bytes.len() && is_rank(bytes[idx]) {
        rank_to = Some((bytes[idx] - b'1') as usize);
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'=' {
        idx += 1;
        let c = *bytes.get(idx).unwrap_or(&b' ') as char;
        let promotion = PieceType::from_char(c)
            .filter(|p| !matches!(p, PieceType::Pawn | PieceType::King))
            .ok_or(SanError::InvalidPromotion {
                san: san.to_string(),
            })?;
        info.promotion = Some(promotion);
    }

    // A bare destination ("Nf3", "e4") parses into the from fields first;
    // move it over.
    if file_to.is_none() && rank_to.is_none() {
        file_to = info.from_file.take();
        rank_to = info.from_rank.take();
    }

    // Non-capturing pawn moves stay on their file.
    if info.piece == Some(PieceType::Pawn) && info.from_file.is_none() && !info.capture {
        info.from_file = file_to;
    }

    match (file_to, rank_to) {
        (Some(file), Some(rank)) => info.to = Some(Square::new(rank, file)),
        _ => {
            return Err(SanError::InvalidSquare {
                san: san.to_string(),
            })
        }
    }

    if let (Some(file), Some(rank)) = (info.from_file, info.from_rank) {
        info.from = Some(Square::new(rank, file));
    }

    Ok(info)
}
