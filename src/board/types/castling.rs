//! Castling rights type.
//!
//! Rights are addressed by the file of the rook that grants them, which
//! makes the representation uniform across standard chess and Chess960.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

/// The two castling wings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastlingSide {
    King,
    Queen,
}

impl CastlingSide {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            CastlingSide::King => 0,
            CastlingSide::Queen => 1,
        }
    }
}

/// Castling rights for both colors.
///
/// For each (color, side) pair this stores the file of the granting rook,
/// or `None` when the right is absent. Standard chess uses files a and h;
/// Chess960 stores the actual rook file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights {
    // [color][side] = rook file
    rooks: [[Option<u8>; 2]; 2],
}

impl CastlingRights {
    /// No castling rights for either color.
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights {
            rooks: [[None; 2]; 2],
        }
    }

    /// Grant a right, recording the granting rook's file (0-7).
    #[inline]
    pub fn set(&mut self, color: Color, side: CastlingSide, rook_file: usize) {
        self.rooks[color.index()][side.index()] = Some(rook_file as u8);
    }

    /// Remove every right.
    pub fn clear_all(&mut self) {
        self.rooks = [[None; 2]; 2];
    }

    /// Remove both rights of one color.
    #[inline]
    pub fn clear_color(&mut self, color: Color) {
        self.rooks[color.index()] = [None; 2];
    }

    /// Remove a single right. Returns the right's position in the
    /// WK, WQ, BK, BQ order, which is also its Zobrist key index.
    #[inline]
    pub fn clear(&mut self, color: Color, side: CastlingSide) -> usize {
        self.rooks[color.index()][side.index()] = None;
        color.index() * 2 + side.index()
    }

    /// Check whether one right is held.
    #[inline]
    #[must_use]
    pub fn has(&self, color: Color, side: CastlingSide) -> bool {
        self.rooks[color.index()][side.index()].is_some()
    }

    /// Check whether a color holds any right.
    #[inline]
    #[must_use]
    pub fn has_color(&self, color: Color) -> bool {
        self.rooks[color.index()][0].is_some() || self.rooks[color.index()][1].is_some()
    }

    /// The granting rook's file for one right, if held.
    #[inline]
    #[must_use]
    pub fn rook_file(&self, color: Color, side: CastlingSide) -> Option<usize> {
        self.rooks[color.index()][side.index()].map(usize::from)
    }

    /// 4-bit presence mask (WK=1, WQ=2, BK=4, BQ=8), used as the Zobrist
    /// castling table index.
    #[inline]
    #[must_use]
    pub fn hash_index(&self) -> usize {
        usize::from(self.has(Color::White, CastlingSide::King))
            + 2 * usize::from(self.has(Color::White, CastlingSide::Queen))
            + 4 * usize::from(self.has(Color::Black, CastlingSide::King))
            + 8 * usize::from(self.has(Color::Black, CastlingSide::Queen))
    }

    /// True when no right is held by either color.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_color(Color::White) && !self.has_color(Color::Black)
    }
}
