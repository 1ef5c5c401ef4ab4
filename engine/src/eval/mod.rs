//! Tapered static evaluator (spec.md 4.5). Every term is scored as a
//! midgame/endgame pair and the two are blended by a material-derived phase
//! weight, then scaled to centipawns. Grounded on
//! `examples/original_source/src/eval.c` - piece-square tables, pawn
//! structure terms, and the phase-interpolation formula are transcribed
//! from there essentially unchanged.

pub mod pawn_table;

use corvid_core::core::bitboard::BitBoard;
use corvid_core::core::piece::PieceType;
use corvid_core::core::sq::SQ;
use corvid_core::core::Player;
use corvid_core::Position;

pub use pawn_table::PawnTable;

/// A midgame/endgame score pair, blended by `interpolate` at the end of
/// `evaluate`. Named `spair_t` in the original source.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SPair {
    pub mg: i32,
    pub eg: i32,
}

impl SPair {
    pub const ZERO: SPair = SPair { mg: 0, eg: 0 };

    #[inline]
    const fn new(mg: i32, eg: i32) -> SPair {
        SPair { mg, eg }
    }

    #[inline]
    fn mul(self, c: i32) -> SPair {
        SPair::new(self.mg * c, self.eg * c)
    }
}

impl std::ops::Add for SPair {
    type Output = SPair;
    #[inline]
    fn add(self, rhs: SPair) -> SPair {
        SPair::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

impl std::ops::AddAssign for SPair {
    #[inline]
    fn add_assign(&mut self, rhs: SPair) {
        self.mg += rhs.mg;
        self.eg += rhs.eg;
    }
}

impl std::ops::SubAssign for SPair {
    #[inline]
    fn sub_assign(&mut self, rhs: SPair) {
        self.mg -= rhs.mg;
        self.eg -= rhs.eg;
    }
}

/// Indexed by `PieceType as usize` (`None`/`King` are both `{0, 0}`).
const MATERIAL: [SPair; 8] = [
    SPair::new(0, 0),
    SPair::new(90, 130),
    SPair::new(325, 325),
    SPair::new(325, 325),
    SPair::new(325, 325),
    SPair::new(500, 500),
    SPair::new(1000, 1000),
    SPair::new(0, 0),
];

const PAWN_DOUBLED: SPair = SPair::new(-13, -13);
const PAWN_ISOLATED: SPair = SPair::new(-30, -30);
const PAWN_BLOCKED: SPair = SPair::new(-10, -10);
const PAWN_PASSED: [SPair; 8] = [
    SPair::new(0, 0),
    SPair::new(5, 15),
    SPair::new(30, 35),
    SPair::new(65, 65),
    SPair::new(110, 105),
    SPair::new(175, 155),
    SPair::new(250, 215),
    SPair::new(0, 0),
];
const KNIGHT_PAWN_AFFINITY: SPair = SPair::new(6, 6);
const BISHOP_PAIR: SPair = SPair::new(50, 50);
const ROOK_PAWN_AFFINITY: SPair = SPair::new(-13, -13);
const KING_SHIELD_CLOSE: SPair = SPair::new(15, 0);
const KING_SHIELD_FAR: SPair = SPair::new(5, 0);

#[rustfmt::skip]
const PAWN_PST_RAW: [SPair; 64] = [
    SPair::new(-3,-41), SPair::new(-15,-40), SPair::new(-23,-38), SPair::new(-27,-37), SPair::new(-27,-37), SPair::new(-23,-38), SPair::new(-15,-40), SPair::new(-3,-41),
    SPair::new(-15,-38), SPair::new(0,-35), SPair::new(-6,-34), SPair::new(-9,-32), SPair::new(-9,-32), SPair::new(-6,-34), SPair::new(0,-35), SPair::new(-15,-38),
    SPair::new(-21,-30), SPair::new(-4,-27), SPair::new(7,-25), SPair::new(4,-22), SPair::new(4,-22), SPair::new(7,-25), SPair::new(-4,-27), SPair::new(-21,-30),
    SPair::new(-22,-19), SPair::new(-5,-16), SPair::new(7,-12), SPair::new(21,-3), SPair::new(21,-3), SPair::new(7,-12), SPair::new(-5,-16), SPair::new(-22,-19),
    SPair::new(-19,-5), SPair::new(-2,-2), SPair::new(11,1), SPair::new(24,10), SPair::new(24,10), SPair::new(11,1), SPair::new(-2,-2), SPair::new(-19,-5),
    SPair::new(-10,12), SPair::new(5,14), SPair::new(17,17), SPair::new(15,20), SPair::new(15,20), SPair::new(17,17), SPair::new(5,14), SPair::new(-10,12),
    SPair::new(2,33), SPair::new(18,35), SPair::new(11,37), SPair::new(8,38), SPair::new(8,38), SPair::new(11,37), SPair::new(18,35), SPair::new(2,33),
    SPair::new(21,58), SPair::new(9,59), SPair::new(1,61), SPair::new(-2,62), SPair::new(-2,62), SPair::new(1,61), SPair::new(9,59), SPair::new(21,58),
];
#[rustfmt::skip]
const KNIGHT_PST_RAW: [SPair; 64] = [
    SPair::new(-17,-12), SPair::new(-12,-6), SPair::new(-8,-3), SPair::new(-6,-1), SPair::new(-6,-1), SPair::new(-8,-3), SPair::new(-12,-6), SPair::new(-17,-12),
    SPair::new(-11,-6), SPair::new(-6,-1), SPair::new(-3,2), SPair::new(-1,3), SPair::new(-1,3), SPair::new(-3,2), SPair::new(-6,-1), SPair::new(-11,-6),
    SPair::new(-7,-3), SPair::new(-2,2), SPair::new(1,5), SPair::new(2,6), SPair::new(2,6), SPair::new(1,5), SPair::new(-2,2), SPair::new(-7,-3),
    SPair::new(-4,-1), SPair::new(1,3), SPair::new(3,6), SPair::new(4,7), SPair::new(4,7), SPair::new(3,6), SPair::new(1,3), SPair::new(-4,-1),
    SPair::new(-1,-1), SPair::new(3,3), SPair::new(6,6), SPair::new(6,7), SPair::new(6,7), SPair::new(6,6), SPair::new(3,3), SPair::new(-1,-1),
    SPair::new(0,-3), SPair::new(4,2), SPair::new(7,5), SPair::new(8,6), SPair::new(8,6), SPair::new(7,5), SPair::new(4,2), SPair::new(0,-3),
    SPair::new(-1,-6), SPair::new(4,-1), SPair::new(7,2), SPair::new(9,3), SPair::new(9,3), SPair::new(7,2), SPair::new(4,-1), SPair::new(-1,-6),
    SPair::new(-2,-12), SPair::new(2,-6), SPair::new(6,-3), SPair::new(8,-1), SPair::new(8,-1), SPair::new(6,-3), SPair::new(2,-6), SPair::new(-2,-12),
];
#[rustfmt::skip]
const BISHOP_PST_RAW: [SPair; 64] = [
    SPair::new(-11,-15), SPair::new(-6,-8), SPair::new(-3,-4), SPair::new(-2,-1), SPair::new(-2,-1), SPair::new(-3,-4), SPair::new(-6,-8), SPair::new(-11,-15),
    SPair::new(-6,-8), SPair::new(-2,-1), SPair::new(0,2), SPair::new(2,4), SPair::new(2,4), SPair::new(0,2), SPair::new(-2,-1), SPair::new(-6,-8),
    SPair::new(-3,-4), SPair::new(0,2), SPair::new(4,6), SPair::new(6,8), SPair::new(6,8), SPair::new(4,6), SPair::new(0,2), SPair::new(-3,-4),
    SPair::new(-2,-1), SPair::new(2,4), SPair::new(6,8), SPair::new(12,9), SPair::new(12,9), SPair::new(6,8), SPair::new(2,4), SPair::new(-2,-1),
    SPair::new(-2,-1), SPair::new(2,4), SPair::new(6,8), SPair::new(12,9), SPair::new(12,9), SPair::new(6,8), SPair::new(2,4), SPair::new(-2,-1),
    SPair::new(-3,-4), SPair::new(0,2), SPair::new(4,6), SPair::new(6,8), SPair::new(6,8), SPair::new(4,6), SPair::new(0,2), SPair::new(-3,-4),
    SPair::new(-6,-8), SPair::new(-2,-1), SPair::new(0,2), SPair::new(2,4), SPair::new(2,4), SPair::new(0,2), SPair::new(-2,-1), SPair::new(-6,-8),
    SPair::new(-11,-15), SPair::new(-6,-8), SPair::new(-3,-4), SPair::new(-2,-1), SPair::new(-2,-1), SPair::new(-3,-4), SPair::new(-6,-8), SPair::new(-11,-15),
];
#[rustfmt::skip]
const KING_PST: [SPair; 64] = [
    SPair::new(57,-94), SPair::new(57,-51), SPair::new(41,-24), SPair::new(33,-10), SPair::new(33,-10), SPair::new(41,-24), SPair::new(57,-51), SPair::new(57,-94),
    SPair::new(56,-51), SPair::new(32,-10), SPair::new(14,15), SPair::new(3,27), SPair::new(3,27), SPair::new(14,15), SPair::new(32,-10), SPair::new(56,-51),
    SPair::new(37,-24), SPair::new(11,15), SPair::new(-11,39), SPair::new(-26,49), SPair::new(-26,49), SPair::new(-11,39), SPair::new(11,15), SPair::new(37,-24),
    SPair::new(24,-10), SPair::new(-4,27), SPair::new(-32,49), SPair::new(-79,55), SPair::new(-79,55), SPair::new(-32,49), SPair::new(-4,27), SPair::new(24,-10),
    SPair::new(17,-10), SPair::new(-11,27), SPair::new(-39,49), SPair::new(-86,55), SPair::new(-86,55), SPair::new(-39,49), SPair::new(-11,27), SPair::new(17,-10),
    SPair::new(16,-24), SPair::new(-10,15), SPair::new(-32,39), SPair::new(-48,49), SPair::new(-48,49), SPair::new(-32,39), SPair::new(-10,15), SPair::new(16,-24),
    SPair::new(20,-51), SPair::new(-3,-10), SPair::new(-21,15), SPair::new(-31,27), SPair::new(-31,27), SPair::new(-21,15), SPair::new(-3,-10), SPair::new(20,-51),
    SPair::new(29,-94), SPair::new(7,-51), SPair::new(-8,-24), SPair::new(-16,-10), SPair::new(-16,-10), SPair::new(-8,-24), SPair::new(7,-51), SPair::new(29,-94),
];

/// Raw PSTs have material folded in at load time (`EvalInit` in the original
/// source does the same thing once at startup rather than per-lookup).
fn pawn_pst() -> &'static [SPair; 64] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<[SPair; 64]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = PAWN_PST_RAW;
        for e in t.iter_mut() {
            *e += MATERIAL[PieceType::Pawn as usize];
        }
        t
    })
}

fn knight_pst() -> &'static [SPair; 64] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<[SPair; 64]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = KNIGHT_PST_RAW;
        for e in t.iter_mut() {
            *e += MATERIAL[PieceType::Knight as usize];
        }
        t
    })
}

fn bishop_pst() -> &'static [SPair; 64] {
    use std::sync::OnceLock;
    static TABLE: OnceLock<[SPair; 64]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = BISHOP_PST_RAW;
        for e in t.iter_mut() {
            *e += MATERIAL[PieceType::BishopLight as usize];
        }
        t
    })
}

/// Centipawn static evaluation from the side-to-move's perspective
/// (spec.md 4.5's `evaluate(pos) -> Score` contract, also relied on by
/// `search::searchIsZugzwang`'s null-move gating). `pawns` caches the pawn
/// structure term keyed on the pawn Zobrist key.
pub fn evaluate(pos: &Position, pawns: &mut PawnTable) -> i32 {
    let mut score = pawns.probe_or_compute(pos);

    for (pt, eval_fn) in [
        (PieceType::Knight, eval_knight as fn(&Position, SQ, Player) -> SPair),
        (PieceType::BishopLight, eval_bishop),
        (PieceType::BishopDark, eval_bishop),
        (PieceType::Rook, eval_rook),
        (PieceType::Queen, eval_queen),
    ] {
        let mut white_sq = pos.piece_bb(Player::White, pt);
        while !white_sq.is_empty() {
            score += eval_fn(pos, white_sq.pop_lsb(), Player::White);
        }
        let mut black_sq = pos.piece_bb(Player::Black, pt);
        while !black_sq.is_empty() {
            score -= eval_fn(pos, black_sq.pop_lsb(), Player::Black);
        }
    }

    score += eval_king(pos, pos.king_sq(Player::White), Player::White);
    score -= eval_king(pos, pos.king_sq(Player::Black), Player::Black);

    if pos.piece_count(Player::White, PieceType::BishopLight) > 0
        && pos.piece_count(Player::White, PieceType::BishopDark) > 0
    {
        score += BISHOP_PAIR;
    }
    if pos.piece_count(Player::Black, PieceType::BishopLight) > 0
        && pos.piece_count(Player::Black, PieceType::BishopDark) > 0
    {
        score -= BISHOP_PAIR;
    }

    let scalar = interpolate(pos, score);
    if pos.turn() == Player::Black {
        -scalar
    } else {
        scalar
    }
}

fn eval_knight(pos: &Position, sq: SQ, colour: Player) -> SPair {
    let adj = if colour == Player::White { sq } else { sq.flip() };
    let mut score = knight_pst()[adj.as_usize()];
    let pawn_count = pos.piece_count(colour, PieceType::Pawn) as i32;
    score += KNIGHT_PAWN_AFFINITY.mul(pawn_count - 5);
    score
}

fn eval_bishop(pos: &Position, sq: SQ, colour: Player) -> SPair {
    let _ = pos;
    let adj = if colour == Player::White { sq } else { sq.flip() };
    bishop_pst()[adj.as_usize()]
}

fn eval_rook(pos: &Position, _sq: SQ, colour: Player) -> SPair {
    let mut score = MATERIAL[PieceType::Rook as usize];
    let pawn_count = pos.piece_count(colour, PieceType::Pawn) as i32;
    score += ROOK_PAWN_AFFINITY.mul(pawn_count - 5);
    score
}

fn eval_queen(_pos: &Position, _sq: SQ, _colour: Player) -> SPair {
    MATERIAL[PieceType::Queen as usize]
}

fn eval_king(pos: &Position, sq: SQ, colour: Player) -> SPair {
    let adj = if colour == Player::White { sq } else { sq.flip() };
    let mut score = KING_PST[adj.as_usize()];

    let pawns = pos.piece_bb(colour, PieceType::Pawn);
    let bb = BitBoard::from_sq(sq);
    let set = (bb.west_one() | bb | bb.east_one()).forward_one(colour);
    let shield_close = pawns & set;
    let shield_far = pawns & set.forward_one(colour);
    score += KING_SHIELD_CLOSE.mul(shield_close.count_bits() as i32);
    score += KING_SHIELD_FAR.mul(shield_far.count_bits() as i32);
    score
}

/// Blends the midgame/endgame score pair by a phase weight derived from
/// remaining non-pawn material, then scales to centipawns so that a pawn on
/// an empty board is worth 100.
fn interpolate(pos: &Position, score: SPair) -> i32 {
    let min_count = pos.piece_count(Player::White, PieceType::Knight)
        + pos.piece_count(Player::White, PieceType::BishopLight)
        + pos.piece_count(Player::White, PieceType::BishopDark)
        + pos.piece_count(Player::Black, PieceType::Knight)
        + pos.piece_count(Player::Black, PieceType::BishopLight)
        + pos.piece_count(Player::Black, PieceType::BishopDark);
    let r_count = pos.piece_count(Player::White, PieceType::Rook) + pos.piece_count(Player::Black, PieceType::Rook);
    let q_count = pos.piece_count(Player::White, PieceType::Queen) + pos.piece_count(Player::Black, PieceType::Queen);

    let w = min_count as i32 + 2 * r_count as i32 + 4 * q_count as i32;
    let weight_eg = (256.0 * 2f64.powf(-((w * w) as f64) / 144.0)).floor() as i32;
    let weight_mg = 256 - weight_eg;

    let pawn_mat = MATERIAL[PieceType::Pawn as usize];
    let denom = weight_mg * pawn_mat.mg + weight_eg * pawn_mat.eg;
    ((weight_mg * score.mg + weight_eg * score.eg) * 100) / denom
}

/// Pawn-structure term computed fresh (no cache), used by the pawn hash
/// table on a miss.
pub(crate) fn compute_pawn_score(pos: &Position) -> SPair {
    let wp = pos.piece_bb(Player::White, PieceType::Pawn);
    let bp = pos.piece_bb(Player::Black, PieceType::Pawn);
    let occ = pos.occupied();

    let front_span_w = wp.north_fill().north_one();
    let front_span_b = bp.south_fill().south_one();
    let rear_span_w = wp.south_fill().south_one();
    let rear_span_b = bp.north_fill().north_one();
    let attacks_w_fill = wp.wingify().north_one().file_fill();
    let attacks_b_fill = bp.wingify().south_one().file_fill();
    let pot_passed_w = !(front_span_b.wingify() | front_span_b);
    let pot_passed_b = !(front_span_w.wingify() | front_span_w);

    let pst = pawn_pst();
    let mut score = SPair::ZERO;

    let mut squares = wp;
    while !squares.is_empty() {
        let sq = squares.pop_lsb();
        let bb = BitBoard::from_sq(sq);
        let doubled = !(bb & rear_span_w).is_empty();
        let isolated = (bb & attacks_w_fill).is_empty();
        let blocked = !(bb & occ.south_one()).is_empty();
        let passed = !(bb & pot_passed_w).is_empty();

        score += pst[sq.as_usize()];
        if doubled {
            score += PAWN_DOUBLED;
        } else if passed {
            score += PAWN_PASSED[sq.rank_idx_of_sq() as usize];
        }
        if isolated {
            score += PAWN_ISOLATED;
        }
        if blocked {
            score += PAWN_BLOCKED;
        }
    }

    let mut squares = bp;
    while !squares.is_empty() {
        let sq = squares.pop_lsb();
        let bb = BitBoard::from_sq(sq);
        let doubled = !(bb & rear_span_b).is_empty();
        let isolated = (bb & attacks_b_fill).is_empty();
        let blocked = !(bb & occ.north_one()).is_empty();
        let passed = !(bb & pot_passed_b).is_empty();

        let flipped = sq.flip();
        score -= pst[flipped.as_usize()];
        if doubled {
            score -= PAWN_DOUBLED;
        } else if passed {
            score -= PAWN_PASSED[flipped.rank_idx_of_sq() as usize];
        }
        if isolated {
            score -= PAWN_ISOLATED;
        }
        if blocked {
            score -= PAWN_BLOCKED;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pos_is_symmetric() {
        let pos = Position::start_pos();
        let mut pawns = PawnTable::new(1);
        assert_eq!(evaluate(&pos, &mut pawns), 0);
    }

    #[test]
    fn up_a_queen_is_clearly_winning() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let mut pawns = PawnTable::new(1);
        assert!(evaluate(&pos, &mut pawns) > 500);
    }
}
