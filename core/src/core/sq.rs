//! A single board square, `0..=63`, plus the out-of-range sentinel used by
//! fields like the en-passant square when it is unset.
//!
//! ```text
//!   8 | 56 57 58 59 60 61 62 63
//!   7 | 48 49 50 51 52 53 54 55
//!   6 | 40 41 42 43 44 45 46 47
//!   5 | 32 33 34 35 36 37 38 39
//!   4 | 24 25 26 27 28 29 30 31
//!   3 | 16 17 18 19 20 21 22 23
//!   2 |  8  9 10 11 12 13 14 15
//!   1 |  0  1  2  3  4  5  6  7
//!     -------------------------
//!        a  b  c  d  e  f  g  h
//! ```

use super::{File, Rank};
use std::fmt;

/// `square = rank * 8 + file`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SQ(pub u8);

/// Sentinel for "no square", used by the en-passant field and king-square
/// placeholders before a board is fully built. Kept outside `0..64` so a
/// stray use as a bitboard index panics immediately in debug builds.
pub const NO_SQ: SQ = SQ(64);

impl SQ {
    #[inline(always)]
    pub fn make(file: File, rank: Rank) -> SQ {
        SQ((rank as u8) * 8 + (file as u8))
    }

    #[inline(always)]
    pub fn is_okay(self) -> bool {
        self.0 < 64
    }

    #[inline(always)]
    pub fn file(self) -> File {
        File::from_index(self.0 & 0b111)
    }

    #[inline(always)]
    pub fn rank(self) -> Rank {
        Rank::from_index(self.0 >> 3)
    }

    #[inline(always)]
    pub fn file_idx_of_sq(self) -> u8 {
        self.0 & 0b111
    }

    #[inline(always)]
    pub fn rank_idx_of_sq(self) -> u8 {
        self.0 >> 3
    }

    /// Toggles the rank, e.g. `a1 <-> a8`. Used to view a black-side
    /// computation from white's perspective (PST lookups, bitbase probing).
    #[inline(always)]
    pub fn flip(self) -> SQ {
        SQ(self.0 ^ 0b111_000)
    }

    /// Toggles the file, e.g. `a1 <-> h1`. Used to canonicalise a bitbase
    /// probe onto files a..d.
    #[inline(always)]
    pub fn mirror(self) -> SQ {
        SQ(self.0 ^ 0b000_111)
    }

    #[inline(always)]
    pub fn distance(self, other: SQ) -> u8 {
        let file_dist = (self.file_idx_of_sq() as i8 - other.file_idx_of_sq() as i8).unsigned_abs();
        let rank_dist = (self.rank_idx_of_sq() as i8 - other.rank_idx_of_sq() as i8).unsigned_abs();
        file_dist.max(rank_dist)
    }

    #[inline(always)]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub fn as_bitboard(self) -> u64 {
        1u64 << self.0
    }
}

impl fmt::Display for SQ {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_okay() {
            return write!(f, "--");
        }
        let file = b'a' + self.file_idx_of_sq();
        let rank = b'1' + self.rank_idx_of_sq();
        write!(f, "{}{}", file as char, rank as char)
    }
}

impl fmt::Debug for SQ {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SQ({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involution() {
        for s in 0..64u8 {
            let sq = SQ(s);
            assert_eq!(sq.flip().flip(), sq);
            assert_eq!(sq.mirror().mirror(), sq);
        }
    }

    #[test]
    fn display_roundtrip() {
        assert_eq!(SQ::make(File::A, Rank::R1).to_string(), "a1");
        assert_eq!(SQ::make(File::H, Rank::R8).to_string(), "h8");
        assert_eq!(SQ::make(File::E, Rank::R4).to_string(), "e4");
    }
}
