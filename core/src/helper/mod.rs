//! Statically-initialised lookup tables: magic-bitboard sliding attacks,
//! knight/king jump tables, and Zobrist keys. Exposed as free functions
//! (spec.md 4.1: `knight_attacks(sq)`, `king_attacks(sq)`, ...) backed by
//! `lazy_static` tables built on first use, rather than through an explicit
//! "has this been initialised yet" handle.

pub mod magic;
pub mod prng;
pub mod zobrist;

use crate::core::bitboard::BitBoard;
use crate::core::piece::PieceType;
use crate::core::sq::SQ;
use crate::core::Player;

pub use magic::{bishop_attacks, king_attacks, knight_attacks, queen_attacks, rook_attacks};

/// The squares a pawn of `colour` standing on `sq` attacks (diagonal
/// captures only, no forward push).
#[inline]
pub fn pawn_attacks_from(sq: SQ, colour: Player) -> BitBoard {
    BitBoard::from_sq(sq).wingify().forward_one(colour)
}

/// Dispatches to the right attack generator for `pt` (spec.md 4.1's
/// `piece_attacks(piece, sq, occ)`). For pawns, returns the attack set for
/// `colour`, since a pawn's attacks depend on which side it belongs to.
#[inline]
pub fn piece_attacks(pt: PieceType, sq: SQ, occ: BitBoard, colour: Player) -> BitBoard {
    match pt {
        PieceType::None => BitBoard(0),
        PieceType::Pawn => pawn_attacks_from(sq, colour),
        PieceType::Knight => knight_attacks(sq),
        PieceType::BishopLight | PieceType::BishopDark => bishop_attacks(sq, occ),
        PieceType::Rook => rook_attacks(sq, occ),
        PieceType::Queen => queen_attacks(sq, occ),
        PieceType::King => king_attacks(sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pawn_attacks_from_centre_has_two_targets() {
        let sq = SQ::make(crate::core::File::D, crate::core::Rank::R4);
        assert_eq!(pawn_attacks_from(sq, Player::White).count_bits(), 2);
        assert_eq!(pawn_attacks_from(sq, Player::Black).count_bits(), 2);
    }

    #[test]
    fn pawn_attacks_from_a_file_has_one_target() {
        let sq = SQ::make(crate::core::File::A, crate::core::Rank::R4);
        assert_eq!(pawn_attacks_from(sq, Player::White).count_bits(), 1);
    }
}
