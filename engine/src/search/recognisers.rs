//! Interior-node recognisers (spec.md 4.6): cheap rule-based shortcuts
//! tried before doing a full move-loop search - draws by rule, "blocked
//! fortress" positions, and three special material-combination endgames.
//! Grounded on `examples/original_source/src/search.c`'s
//! `searchInteriorRecog` and its four `searchInteriorRecogXxx` helpers, and
//! `searchFill`.

use corvid_core::core::bitboard::BitBoard;
use corvid_core::core::piece::PieceType;
use corvid_core::core::sq::SQ;
use corvid_core::core::{File, Player, Rank};
use corvid_core::helper::{pawn_attacks_from, piece_attacks};
use corvid_core::Position;

use crate::bitbase::{Bitbase, BitbaseResult};
use crate::score::{mated_in, Bound, Score, SCORE_DRAW};

pub struct Recognition {
    pub score: Score,
    pub bound: Bound,
}

/// Tries every recogniser in turn; `None` means the caller must fall
/// through to a normal move-loop search. `ply` is needed for
/// `mated_in`; `beta` gates the (expensive) blocked-position test exactly
/// as `searchNodeInternal` does (`node->beta<=ScoreDraw`).
pub fn interior_recog(pos: &mut Position, ply: i32, beta: Score, in_check: bool, bitbase: &Bitbase) -> Option<Recognition> {
    if pos.is_draw() {
        let score = if in_check && pos.halfmove_clock() >= 100 && pos.generate_legal_moves().is_empty() {
            mated_in(ply)
        } else {
            SCORE_DRAW
        };
        return Some(Recognition { score, bound: Bound::EXACT });
    }

    if beta <= SCORE_DRAW && recog_blocked(pos) {
        return Some(Recognition { score: SCORE_DRAW, bound: Bound::LOWER });
    }

    match material_signature(pos) {
        MatSignature::KNNvK => recog_knnvk(pos, in_check),
        MatSignature::KPvK => recog_kpvk(pos, bitbase),
        MatSignature::KBPvK => recog_kbpvk(pos),
        MatSignature::Other => None,
    }
}

enum MatSignature {
    KNNvK,
    KPvK,
    KBPvK,
    Other,
}

/// Classifies the position's material, mirroring `evalGetMatType`'s
/// handful of recognised signatures (only the ones a recogniser exists
/// for - everything else falls through to normal search/evaluation).
fn material_signature(pos: &Position) -> MatSignature {
    let total_pawns = pos.piece_count(Player::White, PieceType::Pawn) + pos.piece_count(Player::Black, PieceType::Pawn);
    let total_knights = pos.piece_count(Player::White, PieceType::Knight) + pos.piece_count(Player::Black, PieceType::Knight);
    let total_bishops = pos.piece_count(Player::White, PieceType::BishopLight)
        + pos.piece_count(Player::White, PieceType::BishopDark)
        + pos.piece_count(Player::Black, PieceType::BishopLight)
        + pos.piece_count(Player::Black, PieceType::BishopDark);
    let total_rooks = pos.piece_count(Player::White, PieceType::Rook) + pos.piece_count(Player::Black, PieceType::Rook);
    let total_queens = pos.piece_count(Player::White, PieceType::Queen) + pos.piece_count(Player::Black, PieceType::Queen);
    let total_minors_major = total_knights + total_bishops + total_rooks + total_queens;

    if total_pawns == 0 && total_bishops == 0 && total_rooks == 0 && total_queens == 0 && total_knights == 2 {
        let one_side_has_both =
            pos.piece_count(Player::White, PieceType::Knight) == 2 || pos.piece_count(Player::Black, PieceType::Knight) == 2;
        if one_side_has_both {
            return MatSignature::KNNvK;
        }
    }

    if total_pawns == 1 && total_minors_major == 0 {
        return MatSignature::KPvK;
    }

    if total_pawns >= 1 && total_bishops == 1 && total_knights == 0 && total_rooks == 0 && total_queens == 0 {
        return MatSignature::KBPvK;
    }

    MatSignature::Other
}

/// KNNvK: the defender simply has to avoid an immediate mate, which is
/// always trivially possible, so it is always a draw.
fn recog_knnvk(pos: &mut Position, in_check: bool) -> Option<Recognition> {
    let defender_has_knights = pos.piece_count(Player::White, PieceType::Knight) == 0;
    let defender = if defender_has_knights { Player::Black } else { Player::White };
    if pos.turn() != defender {
        return None;
    }
    if in_check && pos.generate_legal_moves().is_empty() {
        return None; // actually mate - let search report it normally (can't happen for KNNvK, but stay safe).
    }
    Some(Recognition { score: SCORE_DRAW, bound: Bound::EXACT })
}

/// KPvK: probes the precomputed bitbase. Only ever reports a draw - a win
/// is left to normal search/evaluation so the shortest mating line is
/// still found.
fn recog_kpvk(pos: &Position, bitbase: &Bitbase) -> Option<Recognition> {
    let white_pawns = pos.piece_bb(Player::White, PieceType::Pawn);
    let (pawn_sq, pawn_is_white) = if !white_pawns.is_empty() {
        (white_pawns.into_iter().next().unwrap(), true)
    } else {
        (pos.piece_bb(Player::Black, PieceType::Pawn).into_iter().next().unwrap(), false)
    };

    let (pawn_sq, strong_king, weak_king, stm) = if pawn_is_white {
        (pawn_sq, pos.king_sq(Player::White), pos.king_sq(Player::Black), pos.turn())
    } else {
        // Flip the board vertically so the pawn becomes White's, matching
        // `bitbaseProbe`'s normalisation wrapper.
        (
            pawn_sq.flip(),
            pos.king_sq(Player::Black).flip(),
            pos.king_sq(Player::White).flip(),
            !pos.turn(),
        )
    };

    if bitbase.probe(pawn_sq, strong_king, weak_king, stm) == BitbaseResult::Draw {
        Some(Recognition { score: SCORE_DRAW, bound: Bound::EXACT })
    } else {
        None
    }
}

/// KBPvK "wrong rook pawn": every pawn is on the bishop's non-controlled
/// rook file and the defending king can reach the queening square - dead
/// draw regardless of material count.
fn recog_kbpvk(pos: &Position) -> Option<Recognition> {
    let atk_colour = if pos.piece_count(Player::White, PieceType::Pawn) > 0 { Player::White } else { Player::Black };
    let pawns = pos.piece_bb(atk_colour, PieceType::Pawn);
    let bishop_is_light = pos.piece_count(atk_colour, PieceType::BishopLight) > 0;

    let wrong_file = if bishop_is_light == (atk_colour == Player::White) { file_bb(File::A) } else { file_bb(File::H) };
    if !(pawns & !wrong_file).is_empty() {
        return None;
    }

    let def_king = pos.king_sq(!atk_colour);
    let promo_rank = if atk_colour == Player::White { Rank::R8 } else { Rank::R1 };
    let promo_bb = wrong_file & rank_bb(promo_rank);
    let reach = BitBoard::from_sq(def_king) | corvid_core::helper::king_attacks(def_king);
    if !(reach & promo_bb).is_empty() {
        Some(Recognition { score: SCORE_DRAW, bound: Bound::EXACT })
    } else {
        None
    }
}

/// "Blocked fortress" detector: does the defender (side to move) hold a
/// pawn chain the attacker cannot break through, with a reversible move
/// available to shuffle forever? Grounded on `searchInteriorRecogBlocked`
/// and `searchFill`.
fn recog_blocked(pos: &Position) -> bool {
    let def = pos.turn();
    let atk = !def;
    let occ = pos.occupied();
    let atk_pawns = pos.piece_bb(atk, PieceType::Pawn);
    let atk_pawn_stops = atk_pawns.forward_one(atk);
    let atk_pawn_atks = atk_pawn_stops.wingify();
    let def_occ = pos.color_bb(def);
    let def_pawns = pos.piece_bb(def, PieceType::Pawn);
    let def_king = pos.king_sq(def);

    if !((atk_pawn_stops & !(def_occ | atk_pawns)) | (atk_pawn_atks & def_occ)).is_empty() {
        return false;
    }

    let mut atk_influence = atk_pawn_atks;
    let blockers = atk_pawn_stops & def_occ;
    let target = blockers | BitBoard::from_sq(def_king);
    let fill_occ = blockers | atk_pawns;

    for &pt in &[PieceType::Knight, PieceType::BishopLight, PieceType::BishopDark, PieceType::Rook, PieceType::Queen] {
        let attackers = pos.piece_bb(atk, pt);
        let fill = search_fill(pt, attackers, fill_occ, target, atk);
        if !(fill & target).is_empty() {
            return false;
        }
        atk_influence |= fill;
    }

    let mut def_attacks = BitBoard(0);
    for sq in blockers {
        let piece_type = pos.piece_at(sq).piece_type();
        def_attacks |= piece_attacks(piece_type, sq, occ, def);
    }

    let atk_king = pos.king_sq(atk);
    let king_fill = search_fill(PieceType::King, BitBoard::from_sq(atk_king), def_attacks | atk_pawns, target, atk);
    if !(king_fill & target).is_empty() {
        return false;
    }
    atk_influence |= king_fill;

    let mobile = def_occ & !(def_pawns | blockers | atk_influence);
    let safe = !(occ | atk_influence);
    for sq in mobile {
        let piece_type = pos.piece_at(sq).piece_type();
        let attacks = piece_attacks(piece_type, sq, occ, def);
        if !(attacks & safe).is_empty() {
            return true;
        }
    }

    false
}

/// Flood-fill of every square reachable (in any number of steps, without
/// passing through `occ`) by a piece of type `pt` starting from `init`,
/// short-circuiting as soon as `target` is hit (returning just that final
/// attack set, as `searchFill` does - callers only care whether the fill
/// reaches `target`, not the whole reachable region in that case).
fn search_fill(pt: PieceType, init: BitBoard, occ: BitBoard, target: BitBoard, colour: Player) -> BitBoard {
    let mut fill = init;
    let mut done = occ;
    let mut todo = init;
    while !todo.is_empty() {
        let sq = pop_lsb(&mut todo);
        done |= BitBoard::from_sq(sq);

        let attacks = piece_attacks(pt, sq, occ, colour);
        if !(attacks & target).is_empty() {
            return attacks;
        }

        todo |= attacks & !done;
        fill |= attacks;
    }
    fill
}

fn pop_lsb(bb: &mut BitBoard) -> SQ {
    bb.pop_lsb()
}

fn file_bb(file: File) -> BitBoard {
    let mut bb = BitBoard(0);
    for rank_idx in 0..8u8 {
        bb |= BitBoard::from_sq(SQ::make(file, Rank::from_index(rank_idx)));
    }
    bb
}

fn rank_bb(rank: Rank) -> BitBoard {
    let mut bb = BitBoard(0);
    for file_idx in 0..8u8 {
        bb |= BitBoard::from_sq(SQ::make(File::from_index(file_idx), rank));
    }
    bb
}
