//! Making and unmaking moves, with incremental Zobrist updates.

use crate::zobrist;

use super::attack_tables;
use super::state::State;
use super::types::{CastlingSide, Move, MoveType, Piece, PieceType, Square};
use super::Board;

impl Board {
    /// Make a move produced by the generator. Behavior on arbitrary
    /// malformed moves is undefined.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert_eq!(
            self.at(mv.from()).map(Piece::color),
            Some(self.side_to_move)
        );

        let us = self.side_to_move;
        let capture = self.at(mv.to()).is_some() && mv.type_of() != MoveType::Castling;
        let captured = self.at(mv.to());
        let moving = self.at(mv.from()).map(Piece::kind);

        self.history.push(State {
            hash: self.hash,
            castling: self.castling,
            en_passant: self.en_passant,
            half_moves: self.half_moves,
            captured,
        });

        self.half_moves += 1;
        self.plies_played += 1;

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= zobrist::en_passant(ep.file());
        }

        if capture {
            let captured = captured.expect("capture flag implies an occupied square");
            self.half_moves = 0;

            self.hash ^= zobrist::piece(captured, mv.to());
            self.remove_piece(captured, mv.to());

            // A rook captured on the opponent's back rank may carry a
            // castling right.
            if captured.kind() == PieceType::Rook && mv.to().back_rank(!us) {
                let side = if mv.to() > self.king_sq(!us) {
                    CastlingSide::King
                } else {
                    CastlingSide::Queen
                };
                if self.castling.rook_file(!us, side) == Some(mv.to().file()) {
                    let idx = self.castling.clear(!us, side);
                    self.hash ^= zobrist::castling_right(idx);
                }
            }
        }

        match moving {
            Some(PieceType::King) if self.castling.has_color(us) => {
                self.hash ^= zobrist::castling(self.castling.hash_index());
                self.castling.clear_color(us);
                self.hash ^= zobrist::castling(self.castling.hash_index());
            }
            Some(PieceType::Rook) if mv.from().back_rank(us) => {
                let side = if mv.from() > self.king_sq(us) {
                    CastlingSide::King
                } else {
                    CastlingSide::Queen
                };
                if self.castling.rook_file(us, side) == Some(mv.from().file()) {
                    let idx = self.castling.clear(us, side);
                    self.hash ^= zobrist::castling_right(idx);
                }
            }
            Some(PieceType::Pawn) => {
                self.half_moves = 0;

                // A double push stores the skipped square, but only when an
                // enemy pawn stands next to the landing square.
                if mv.to().index().abs_diff(mv.from().index()) == 16 {
                    let skipped = mv.to().xor(8);
                    let ep_mask = attack_tables::pawn(us, skipped);
                    if (ep_mask & self.pieces(PieceType::Pawn, !us)).any() {
                        self.en_passant = Some(skipped);
                        self.hash ^= zobrist::en_passant(skipped.file());
                        debug_assert!(self.at(skipped).is_none());
                    }
                }
            }
            _ => {}
        }

        match mv.type_of() {
            MoveType::Castling => {
                debug_assert_eq!(self.at(mv.from()).map(Piece::kind), Some(PieceType::King));
                debug_assert_eq!(self.at(mv.to()).map(Piece::kind), Some(PieceType::Rook));

                let king_side = mv.to() > mv.from();
                let king_to = Square::new(0, if king_side { 6 } else { 2 }).relative(us);
                let rook_to = Square::new(0, if king_side { 5 } else { 3 }).relative(us);

                let king = Piece::new(PieceType::King, us);
                let rook = Piece::new(PieceType::Rook, us);

                self.remove_piece(king, mv.from());
                self.remove_piece(rook, mv.to());
                self.place_piece(king, king_to);
                self.place_piece(rook, rook_to);

                self.hash ^= zobrist::piece(king, mv.from()) ^ zobrist::piece(king, king_to);
                self.hash ^= zobrist::piece(rook, mv.to()) ^ zobrist::piece(rook, rook_to);
            }
            MoveType::Promotion => {
                let pawn = Piece::new(PieceType::Pawn, us);
                let promoted = Piece::new(mv.promotion_type(), us);

                self.remove_piece(pawn, mv.from());
                self.place_piece(promoted, mv.to());

                self.hash ^= zobrist::piece(pawn, mv.from()) ^ zobrist::piece(promoted, mv.to());
            }
            _ => {
                let piece = self.at(mv.from()).expect("moving piece present");
                debug_assert!(self.at(mv.to()).is_none());

                self.remove_piece(piece, mv.from());
                self.place_piece(piece, mv.to());

                self.hash ^= zobrist::piece(piece, mv.from()) ^ zobrist::piece(piece, mv.to());
            }
        }

        if mv.type_of() == MoveType::EnPassant {
            let pawn = Piece::new(PieceType::Pawn, !us);
            let pawn_sq = mv.to().xor(8);
            debug_assert_eq!(self.at(pawn_sq), Some(pawn));

            self.remove_piece(pawn, pawn_sq);
            self.hash ^= zobrist::piece(pawn, pawn_sq);
        }

        self.hash ^= zobrist::side_to_move();
        self.side_to_move = !us;

        #[cfg(debug_assertions)]
        self.assert_invariants();
    }

    /// Undo the most recent move. `mv` must be the move that was made.
    pub fn unmake_move(&mut self, mv: Move) {
        let prev = self.history.pop().expect("unmake without history");

        self.en_passant = prev.en_passant;
        self.castling = prev.castling;
        self.half_moves = prev.half_moves;
        self.plies_played -= 1;
        self.side_to_move = !self.side_to_move;

        let us = self.side_to_move;

        match mv.type_of() {
            MoveType::Castling => {
                let king_side = mv.to() > mv.from();
                let king_to = Square::new(0, if king_side { 6 } else { 2 }).relative(us);
                let rook_to = Square::new(0, if king_side { 5 } else { 3 }).relative(us);

                let king = Piece::new(PieceType::King, us);
                let rook = Piece::new(PieceType::Rook, us);
                debug_assert_eq!(self.at(king_to), Some(king));
                debug_assert_eq!(self.at(rook_to), Some(rook));

                self.remove_piece(rook, rook_to);
                self.remove_piece(king, king_to);
                self.place_piece(king, mv.from());
                self.place_piece(rook, mv.to());

                self.hash = prev.hash;
                return;
            }
            MoveType::Promotion => {
                let promoted = Piece::new(mv.promotion_type(), us);
                let pawn = Piece::new(PieceType::Pawn, us);
                debug_assert_eq!(self.at(mv.to()), Some(promoted));

                self.remove_piece(promoted, mv.to());
                self.place_piece(pawn, mv.from());

                if let Some(captured) = prev.captured {
                    self.place_piece(captured, mv.to());
                }

                self.hash = prev.hash;
                return;
            }
            _ => {
                let piece = self.at(mv.to()).expect("moved piece present");
                self.remove_piece(piece, mv.to());
                self.place_piece(piece, mv.from());
            }
        }

        if mv.type_of() == MoveType::EnPassant {
            let pawn = Piece::new(PieceType::Pawn, !us);
            self.place_piece(pawn, mv.to().xor(8));
        } else if let Some(captured) = prev.captured {
            self.place_piece(captured, mv.to());
        }

        self.hash = prev.hash;
    }

    /// Make a null move: flip the side to move and clear en passant.
    pub fn make_null_move(&mut self) {
        self.history.push(State {
            hash: self.hash,
            castling: self.castling,
            en_passant: self.en_passant,
            half_moves: self.half_moves,
            captured: None,
        });

        self.hash ^= zobrist::side_to_move();
        if let Some(ep) = self.en_passant.take() {
            self.hash ^= zobrist::en_passant(ep.file());
        }

        self.side_to_move = !self.side_to_move;
        self.plies_played += 1;
    }

    /// Undo a null move.
    pub fn unmake_null_move(&mut self) {
        let prev = self.history.pop().expect("unmake without history");

        self.en_passant = prev.en_passant;
        self.castling = prev.castling;
        self.half_moves = prev.half_moves;
        self.hash = prev.hash;

        self.plies_played -= 1;
        self.side_to_move = !self.side_to_move;
    }
}
