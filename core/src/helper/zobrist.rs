//! Zobrist keys (spec.md 3): a main key (position + stm + ep + castling),
//! a pawn-only key, and a material key. All three are incrementally
//! maintained by `Position::make_move`/`undo_move`; this module only
//! supplies the per-piece-per-square (and per-count) random constants,
//! generated once at startup with a fixed seed so runs are reproducible
//! (grounded on `pleco::helper::zobrist`, itself seeded at `23_081`).

use super::prng::PRNG;
use crate::core::piece::{Piece, PIECE_TYPE_CNT};
use crate::core::sq::SQ;
use crate::core::Player;

const ZOBRIST_SEED: u64 = 23_081;
const SQ_CNT: usize = 64;
const FILE_CNT: usize = 8;
const PIECE_SLOTS: usize = PIECE_TYPE_CNT * 2; // (colour << 3) | piece_type, 16 slots
const MAX_PIECE_COUNT: usize = 11; // 0..=10 of one piece type+colour is always enough headroom

struct ZobristTables {
    piece_square: [[u64; PIECE_SLOTS]; SQ_CNT],
    en_passant_file: [u64; FILE_CNT],
    castling: [u64; 16],
    side: u64,
    material: [[u64; MAX_PIECE_COUNT]; PIECE_SLOTS],
}

fn build() -> ZobristTables {
    let mut rng = PRNG::init(ZOBRIST_SEED);
    let mut piece_square = [[0u64; PIECE_SLOTS]; SQ_CNT];
    for sq in piece_square.iter_mut() {
        for slot in sq.iter_mut() {
            *slot = rng.rand();
        }
    }

    let mut en_passant_file = [0u64; FILE_CNT];
    for f in en_passant_file.iter_mut() {
        *f = rng.rand();
    }

    // Castling rights: one random key per individual right (bit 0..3), the
    // combined key for a rights mask is the XOR of the set bits' keys.
    let mut single_right = [0u64; 4];
    for r in single_right.iter_mut() {
        *r = rng.rand();
    }
    let mut castling = [0u64; 16];
    for (mask, key) in castling.iter_mut().enumerate() {
        let mut k = 0u64;
        for (bit, right_key) in single_right.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                k ^= right_key;
            }
        }
        *key = k;
    }

    let side = rng.rand();

    let mut material = [[0u64; MAX_PIECE_COUNT]; PIECE_SLOTS];
    for piece in material.iter_mut() {
        for count in piece.iter_mut() {
            *count = rng.rand();
        }
    }

    ZobristTables {
        piece_square,
        en_passant_file,
        castling,
        side,
        material,
    }
}

lazy_static::lazy_static! {
    static ref TABLES: ZobristTables = build();
}

#[inline]
pub fn z_square(sq: SQ, piece: Piece) -> u64 {
    debug_assert!(sq.is_okay());
    TABLES.piece_square[sq.as_usize()][piece.0 as usize]
}

#[inline]
pub fn z_ep(sq: SQ) -> u64 {
    debug_assert!(sq.is_okay());
    TABLES.en_passant_file[sq.file_idx_of_sq() as usize]
}

#[inline]
pub fn z_castle(rights: u8) -> u64 {
    debug_assert!((rights as usize) < 16);
    TABLES.castling[rights as usize]
}

#[inline]
pub fn z_side() -> u64 {
    TABLES.side
}

/// Material-key contribution for `count` pieces of `piece` (colour + type).
/// `Position` XORs this in/out as a piece's count changes, so the material
/// key only depends on how many of each piece remain, not where they stand.
#[inline]
pub fn z_material(piece: Piece, count: u8) -> u64 {
    debug_assert!((count as usize) < MAX_PIECE_COUNT);
    TABLES.material[piece.0 as usize][count as usize]
}

#[inline]
pub fn z_side_of(player: Player) -> u64 {
    match player {
        Player::White => 0,
        Player::Black => z_side(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceType;

    #[test]
    fn distinct_squares_give_distinct_keys() {
        let p = Piece::make(Player::White, PieceType::Pawn);
        assert_ne!(z_square(SQ(0), p), z_square(SQ(1), p));
    }

    #[test]
    fn empty_castling_rights_key_is_zero() {
        assert_eq!(z_castle(0), 0);
    }
}
