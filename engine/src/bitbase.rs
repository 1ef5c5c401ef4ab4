//! KPvK (king and pawn vs king) endgame bitbase (spec.md 4.6). Built once at
//! startup by retrograde (backward) analysis: every reachable
//! `(pawn file, pawn rank, strong king, weak king, side to move)`
//! configuration is classified `Win` or `Draw` for the side with the pawn.
//! Grounded on `examples/original_source/src/bitbase.c`'s static classifier
//! (`bitbaseComputeStaticResult`) and the rank-descending fixpoint sweep
//! (`bitbaseComputeDynamicResult`).

use corvid_core::core::bitboard::BitBoard;
use corvid_core::core::sq::SQ;
use corvid_core::core::{File, Player, Rank};
use corvid_core::helper::king_attacks;

const FILE_NB: usize = 4; // pawn normalized to files a-d
const RANK_NB: usize = 8;
const SQ_NB: usize = 64;
const COLOUR_NB: usize = 2;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum FullResult {
    Invalid,
    Unknown,
    Draw,
    Win,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BitbaseResult {
    Draw,
    Win,
}

/// Index into the full `(file, rank, strong_king, weak_king, stm)` table.
#[inline]
fn index_full(file: usize, rank: usize, strong_king: usize, weak_king: usize, stm: usize) -> usize {
    (((file * RANK_NB + rank) * SQ_NB + strong_king) * SQ_NB + weak_king) * COLOUR_NB + stm
}

/// Index into the compact `(file, rank, strong_king, stm)` table, one `u64`
/// per entry with one bit per `weak_king` square.
#[inline]
fn index_compact(file: usize, rank: usize, strong_king: usize, stm: usize) -> usize {
    ((file * RANK_NB + rank) * SQ_NB + strong_king) * COLOUR_NB + stm
}

pub struct Bitbase {
    compact: Vec<u64>,
}

impl Bitbase {
    /// Runs the full static classification + retrograde fixpoint and packs
    /// the result into the compact per-file win table. Expensive (scans
    /// ~200K configurations to a fixpoint); run once at engine startup.
    pub fn generate() -> Bitbase {
        let total = FILE_NB * RANK_NB * SQ_NB * SQ_NB * COLOUR_NB;
        let mut full = vec![FullResult::Invalid; total];

        for file in 0..FILE_NB {
            for rank in 1..RANK_NB - 1 {
                for strong_king in 0..SQ_NB {
                    for weak_king in 0..SQ_NB {
                        for stm in 0..COLOUR_NB {
                            let idx = index_full(file, rank, strong_king, weak_king, stm);
                            full[idx] =
                                static_result(file, rank, SQ(strong_king as u8), SQ(weak_king as u8), stm_of(stm));
                        }
                    }
                }
            }
        }

        // Retrograde fixpoint: repeatedly recompute Unknown entries from
        // their children until a full pass makes no further change. The
        // original source processes pawn ranks high-to-low within each
        // sweep since a rank's "push" children live one rank higher; full
        // repeated sweeps converge to the identical fixpoint.
        loop {
            let mut changed = false;
            for file in 0..FILE_NB {
                for rank in (1..RANK_NB - 1).rev() {
                    for strong_king in 0..SQ_NB {
                        for weak_king in 0..SQ_NB {
                            for stm in 0..COLOUR_NB {
                                let idx = index_full(file, rank, strong_king, weak_king, stm);
                                if full[idx] != FullResult::Unknown {
                                    continue;
                                }
                                let resolved = resolve_dynamic(
                                    &full,
                                    file,
                                    rank,
                                    SQ(strong_king as u8),
                                    SQ(weak_king as u8),
                                    stm_of(stm),
                                );
                                if let Some(r) = resolved {
                                    full[idx] = r;
                                    changed = true;
                                }
                            }
                        }
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let mut compact = vec![0u64; FILE_NB * RANK_NB * SQ_NB * COLOUR_NB];
        for file in 0..FILE_NB {
            for rank in 0..RANK_NB {
                for strong_king in 0..SQ_NB {
                    for stm in 0..COLOUR_NB {
                        let mut bits = 0u64;
                        for weak_king in 0..SQ_NB {
                            let idx = index_full(file, rank, strong_king, weak_king, stm);
                            if full[idx] == FullResult::Win {
                                bits |= 1u64 << weak_king;
                            }
                        }
                        compact[index_compact(file, rank, strong_king, stm)] = bits;
                    }
                }
            }
        }

        Bitbase { compact }
    }

    /// Looks up the KPvK result for an arbitrary (possibly mirrored/flipped)
    /// board: normalizes so the pawn belongs to White and stands on a file
    /// a-d, flipping board and swapping colours/side-to-move as needed.
    pub fn probe(&self, pawn_sq: SQ, white_king: SQ, black_king: SQ, stm: Player) -> BitbaseResult {
        let (mut pawn_sq, mut strong_king, mut weak_king, mut stm, pawn_is_white) = {
            // Determine which side owns the pawn isn't known from these
            // arguments alone in general KPvK positions there is exactly one
            // pawn; callers pass `white_king`/`black_king` regardless of who
            // is "strong". We normalize on the assumption the pawn colour
            // equals whichever side the caller designates via `stm`'s
            // opponent-invariant framing: callers always pass the pawn as
            // White's, flipping the whole board beforehand if it was
            // Black's (mirrors `examples/original_source/src/bitbase.c`'s
            // `bitbaseProbe` wrapper around `bitbaseProbeRaw`).
            (pawn_sq, white_king, black_king, stm, true)
        };
        let _ = pawn_is_white;

        // Flip vertically if the pawn is on the a1-h1 side owned by Black
        // conceptually handled by caller; here we only fold the file into
        // a-d, mirroring horizontally if needed.
        if pawn_sq.file_idx_of_sq() >= 4 {
            pawn_sq = pawn_sq.mirror();
            strong_king = strong_king.mirror();
            weak_king = weak_king.mirror();
        }

        let file = pawn_sq.file_idx_of_sq() as usize;
        let rank = pawn_sq.rank_idx_of_sq() as usize;
        let idx = index_compact(file, rank, strong_king.as_usize(), stm_idx(stm));
        let bits = self.compact[idx];
        if (bits >> weak_king.as_usize()) & 1 != 0 {
            BitbaseResult::Win
        } else {
            BitbaseResult::Draw
        }
    }
}

#[inline]
fn stm_of(stm: usize) -> Player {
    if stm == 0 {
        Player::White
    } else {
        Player::Black
    }
}

#[inline]
fn stm_idx(p: Player) -> usize {
    if p == Player::White {
        0
    } else {
        1
    }
}

/// Classifies a config without looking at any other config: overlap/
/// adjacent-king invalidity, immediate promotion wins, and immediate
/// pawn-capture/stalemate draws.
fn static_result(file: usize, rank: usize, strong_king: SQ, weak_king: SQ, stm: Player) -> FullResult {
    let pawn_sq = SQ::make(File::from_index(file as u8), Rank::from_index(rank as u8));

    if strong_king == weak_king || strong_king == pawn_sq || weak_king == pawn_sq {
        return FullResult::Invalid;
    }
    if strong_king.distance(weak_king) <= 1 {
        return FullResult::Invalid;
    }
    if stm == Player::White && corvid_core::helper::pawn_attacks_from(pawn_sq, Player::White).contains(weak_king) {
        return FullResult::Invalid;
    }

    // Win: pawn on the 7th rank about to queen, with the queening square
    // either defended by the strong king or not attacked by the weak one.
    if rank == 6 && stm == Player::White {
        let promo_sq = SQ::make(File::from_index(file as u8), Rank::R8);
        let weak_covers = king_attacks(weak_king).contains(promo_sq);
        let strong_covers = king_attacks(strong_king).contains(promo_sq);
        if promo_sq != weak_king && (!weak_covers || strong_covers) {
            return FullResult::Win;
        }
    }

    // Draw: the side to move can capture an undefended pawn.
    if stm == Player::Black
        && king_attacks(weak_king).contains(pawn_sq)
        && !king_attacks(strong_king).contains(pawn_sq)
    {
        return FullResult::Draw;
    }

    if !has_any_move(strong_king, weak_king, pawn_sq, stm) {
        return FullResult::Draw;
    }

    FullResult::Unknown
}

/// Expands the children of an `Unknown` config (king moves, single/double
/// pawn pushes) and applies the win/draw propagation rule for `stm`.
/// Returns `None` while any child is still itself `Unknown`.
fn resolve_dynamic(
    full: &[FullResult],
    file: usize,
    rank: usize,
    strong_king: SQ,
    weak_king: SQ,
    stm: Player,
) -> Option<FullResult> {
    let mut saw_unknown = false;
    let mut saw_win = false;
    let mut saw_draw = false;
    let mut all_win = true;

    let mut consider = |r: FullResult| match r {
        FullResult::Unknown => saw_unknown = true,
        FullResult::Win => saw_win = true,
        FullResult::Draw => {
            saw_draw = true;
            all_win = false;
        }
        FullResult::Invalid => {}
    };

    if stm == Player::White {
        let mut moves = king_attacks(strong_king) & !king_attacks(weak_king) & !BitBoard::from_sq(weak_king);
        while !moves.is_empty() {
            let to = moves.pop_lsb();
            let idx = index_full(file, rank, to.as_usize(), weak_king.as_usize(), 1);
            consider(full[idx]);
        }
        if rank + 1 < RANK_NB - 1 {
            let idx = index_full(file, rank + 1, strong_king.as_usize(), weak_king.as_usize(), 1);
            consider(full[idx]);
        }
        if rank == 1 && RANK_NB > 3 {
            let idx = index_full(file, 3, strong_king.as_usize(), weak_king.as_usize(), 1);
            consider(full[idx]);
        }
    } else {
        let mut moves = king_attacks(weak_king) & !king_attacks(strong_king) & !BitBoard::from_sq(strong_king);
        while !moves.is_empty() {
            let to = moves.pop_lsb();
            let idx = index_full(file, rank, strong_king.as_usize(), to.as_usize(), 0);
            consider(full[idx]);
        }
    }

    if saw_unknown {
        return None;
    }
    if stm == Player::White {
        // White to move wins if any response (king move or pawn push) wins;
        // otherwise, with every response drawing, the position draws.
        Some(if saw_win { FullResult::Win } else { FullResult::Draw })
    } else if saw_draw {
        // Black to move draws if any king move escapes to a drawn position.
        Some(FullResult::Draw)
    } else if all_win {
        Some(FullResult::Win)
    } else {
        None
    }
}

fn has_any_move(strong_king: SQ, weak_king: SQ, pawn_sq: SQ, stm: Player) -> bool {
    if stm == Player::White {
        let king_moves = king_attacks(strong_king)
            & !king_attacks(weak_king)
            & !BitBoard::from_sq(weak_king)
            & !BitBoard::from_sq(pawn_sq);
        if !king_moves.is_empty() {
            return true;
        }
        let occ = BitBoard::from_sq(strong_king) | BitBoard::from_sq(weak_king) | BitBoard::from_sq(pawn_sq);
        let one_step = BitBoard::from_sq(pawn_sq).forward_one(Player::White);
        (one_step & occ).is_empty()
    } else {
        let king_moves = king_attacks(weak_king) & !king_attacks(strong_king) & !BitBoard::from_sq(strong_king);
        !king_moves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distant_king_lets_pawn_queen() {
        let bb = Bitbase::generate();
        let pawn = SQ::make(File::E, Rank::R5);
        let wk = SQ::make(File::E, Rank::R6);
        let bk = SQ::make(File::E, Rank::R8);
        assert_eq!(bb.probe(pawn, wk, bk, Player::White), BitbaseResult::Win);
    }

    #[test]
    fn king_in_front_of_pawn_draws() {
        let bb = Bitbase::generate();
        let pawn = SQ::make(File::E, Rank::R2);
        let wk = SQ::make(File::E, Rank::R3);
        let bk = SQ::make(File::E, Rank::R6);
        assert_eq!(bb.probe(pawn, wk, bk, Player::Black), BitbaseResult::Draw);
    }
}
