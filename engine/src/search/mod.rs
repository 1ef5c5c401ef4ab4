//! Iterative-deepening alpha-beta search (spec.md 4.4/4.8): PVS with a
//! transposition table, null-move pruning, internal iterative deepening,
//! late-move reductions, check extensions, mate-distance pruning, and
//! quiescence search at the leaves. Grounded on
//! `examples/original_source/src/search.c`'s `searchIDLoop`/`searchNode`/
//! `searchNodeInternal`/`searchQNodeInternal`. Unlike the original (one
//! global worker thread driven through opaque `Node` pointers), state is
//! threaded explicitly through a `Search` struct and plain recursive calls,
//! matching SPEC_FULL.md 5's single-worker-thread model.

pub mod recognisers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use corvid_core::core::piece::PieceType;
use corvid_core::core::piece_move::Move;
use corvid_core::Position;

use crate::bitbase::Bitbase;
use crate::eval::{evaluate, PawnTable};
use crate::movepick::{quiescence_moves, MovePicker};
use crate::score::{
    mate_in, mated_in, score_is_mate, Bound, Score, DEPTH_MAX, SCORE_DRAW, SCORE_INF, SCORE_MATE,
};
use crate::see::see_sign;
use crate::tables::counter_move::CounterMoveTable;
use crate::tables::history::HistoryTable;
use crate::tables::killers::KillerTable;
use crate::time::TimeControl;
use crate::tt::TranspositionTable;

const NULL_MOVE_REDUCTION: i16 = 1;
const IID_MIN_DEPTH: i16 = 2;
const IID_REDUCTION: i16 = 3;
const LMR_DEPTH_LIMIT: i16 = 3;
const LMR_MOVE_LIMIT: usize = 4;
const LMR_REDUCTION: i16 = 1;

/// One best-move search, carrying every table the move ordering and
/// pruning heuristics need across the whole iterative-deepening run.
pub struct Search {
    pub tt: TranspositionTable,
    pub pawns: PawnTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub counter_moves: CounterMoveTable,
    pub bitbase: Bitbase,
    nodes: u64,
    time: TimeControl,
    stop: Arc<AtomicBool>,
    root_prev_move: Move,
}

/// Outcome of one `go` search: the move to play, its score, and the bound
/// kind (an `Exact` score at the final completed depth; the caller should
/// not trust a partial depth's score as more than a rough guide).
pub struct SearchResult {
    pub best_move: Move,
    pub score: Score,
    pub bound: Bound,
    pub depth: i16,
}

impl Search {
    pub fn new(tt_size_mb: usize, pawn_table_size_mb: usize) -> Search {
        Search {
            tt: TranspositionTable::new(tt_size_mb),
            pawns: PawnTable::new(pawn_table_size_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            counter_moves: CounterMoveTable::new(),
            bitbase: Bitbase::generate(),
            nodes: 0,
            time: TimeControl::infinite(),
            stop: Arc::new(AtomicBool::new(false)),
            root_prev_move: Move::NULL,
        }
    }

    pub fn node_count(&self) -> u64 {
        self.nodes
    }

    /// A handle the UCI loop can hand to a separate thread (or store
    /// alongside the worker) to request the in-progress search stop at the
    /// next opportunity, matching spec.md 5's atomic stop flag raised by
    /// the `stop` command.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn request_stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Iterative deepening loop (`searchIDLoop`): searches depth 1, 2, 3...
    /// up to `max_depth`, returning the last fully-completed iteration's
    /// result. `on_depth_done` lets the caller (the UCI loop) emit `info
    /// depth ... score ... pv ...` after each completed iteration.
    pub fn iterative_deepening(
        &mut self,
        pos: &mut Position,
        max_depth: i16,
        time: TimeControl,
        mut on_depth_done: impl FnMut(&Search, &mut Position, i16, Score, Bound),
    ) -> SearchResult {
        self.nodes = 0;
        self.stop.store(false, Ordering::Relaxed);
        self.time = time;
        self.tt.new_search();
        self.history.clear();
        self.killers.clear();

        let mut best_move = Move::INVALID;
        let mut best_score = SCORE_DRAW;
        let mut best_bound = Bound::NONE;

        for depth in 1..=max_depth {
            let in_check = pos.in_check();
            let (score, bound, mv) = self.search_root(pos, depth, in_check);
            if bound == Bound::NONE {
                break; // ran out of time before completing this depth
            }
            best_move = mv;
            best_score = score;
            best_bound = bound;
            on_depth_done(self, pos, depth, score, bound);
            if self.is_time_up() {
                break;
            }
        }

        if best_move == Move::INVALID {
            let legal = pos.generate_legal_moves();
            best_move = legal.iter().copied().next().unwrap_or(Move::INVALID);
        }

        self.history.clear();
        self.killers.clear();

        SearchResult { best_move, score: best_score, bound: best_bound, depth: max_depth }
    }

    fn search_root(&mut self, pos: &mut Position, depth: i16, in_check: bool) -> (Score, Bound, Move) {
        let mut best_move = Move::INVALID;
        let score = self.search_node(pos, depth, 0, -SCORE_INF, SCORE_INF, in_check, &mut best_move);
        if best_move == Move::INVALID {
            (score, Bound::NONE, Move::INVALID)
        } else {
            (score, Bound::EXACT, best_move)
        }
    }

    /// Negamax with alpha-beta, matching `searchNodeInternal`. Returns the
    /// score and writes the best move found into `best_move` (left
    /// untouched if the search was aborted for time before any move
    /// completed, mirroring `node->bound==BoundNone`).
    fn search_node(
        &mut self,
        pos: &mut Position,
        depth: i16,
        ply: i32,
        mut alpha: Score,
        beta: Score,
        in_check: bool,
        best_move: &mut Move,
    ) -> Score {
        if depth <= 0 {
            return self.search_qnode(pos, 0, ply, alpha, beta, in_check);
        }

        if ply as usize >= DEPTH_MAX {
            return evaluate(pos, &mut self.pawns);
        }

        self.nodes += 1;
        let is_pv = beta - alpha > 1;

        if ply > 0 {
            let matedin = mated_in(ply);
            if matedin >= beta {
                return matedin;
            }
            let matein = mate_in(ply);
            if matein <= alpha {
                return matein;
            }

            if let Some(r) = recognisers::interior_recog(pos, ply, beta, in_check, &self.bitbase) {
                return r.score;
            }
        }

        let mut tt_move = Move::INVALID;
        if let Some(probe) = self.tt.probe(pos, ply) {
            tt_move = probe.mv;
            if probe.depth as i16 >= depth && probe.bound.causes_cutoff(probe.score, alpha, beta) {
                *best_move = probe.mv;
                return probe.score;
            }
        }

        // Null-move pruning.
        if !is_pv
            && depth > 1 + NULL_MOVE_REDUCTION
            && !score_is_mate(beta)
            && !self.is_zugzwang(pos, in_check)
            && evaluate(pos, &mut self.pawns) >= beta
        {
            pos.do_null_move();
            let mut unused = Move::INVALID;
            let score = -self.search_node(
                pos,
                depth - 1 - NULL_MOVE_REDUCTION,
                ply + 1,
                -beta,
                -beta + 1,
                false,
                &mut unused,
            );
            pos.undo_null_move();
            if score >= beta {
                return beta;
            }
        }

        // Internal iterative deepening: no hash move at a PV node deep
        // enough to be worth the extra work finding a good ordering guess.
        if IID_REDUCTION > 0 && depth >= IID_MIN_DEPTH && depth > IID_REDUCTION && is_pv && tt_move == Move::INVALID {
            let mut iid_move = Move::INVALID;
            self.search_node(pos, depth - IID_REDUCTION, ply, alpha, beta, in_check, &mut iid_move);
            tt_move = iid_move;
        }

        let killers = [self.killers.get(ply as usize, 0), self.killers.get(ply as usize, 1)];
        let counter_move = self.counter_moves.get(self.root_prev_move);
        let mut picker = MovePicker::new(pos, tt_move, killers, counter_move, &self.history);

        let mut best_score = crate::score::SCORE_INVALID;
        let mut bound = Bound::NONE;
        let mut move_number = 0usize;
        let orig_alpha = alpha;

        loop {
            let history_snapshot = &self.history;
            let mv = picker.next(pos, history_snapshot);
            if mv == Move::INVALID {
                break;
            }
            move_number += 1;

            let is_capture_or_promo = is_capture(pos, mv) || is_promotion(pos, mv);
            let prev_move = self.root_prev_move;
            self.root_prev_move = mv;
            pos.make_move(mv);
            let child_in_check = pos.in_check();

            let mut extension: i16 = 0;
            if child_in_check {
                extension += 1;
            }
            let mut reduction: i16 = 0;
            if extension == 0
                && !in_check
                && !child_in_check
                && !is_pv
                && depth >= LMR_DEPTH_LIMIT
                && !is_capture_or_promo
                && move_number > LMR_MOVE_LIMIT
            {
                reduction += LMR_REDUCTION;
            }
            let child_depth = depth - 1 + extension - reduction;

            let mut child_best = Move::INVALID;
            let mut score = if move_number > 1 {
                let s = -self.search_node(pos, child_depth, ply + 1, -alpha - 1, -alpha, child_in_check, &mut child_best);
                if s > alpha && s < beta {
                    -self.search_node(pos, depth - 1 + extension, ply + 1, -beta, -alpha, child_in_check, &mut child_best)
                } else {
                    s
                }
            } else {
                -self.search_node(pos, child_depth, ply + 1, -beta, -alpha, child_in_check, &mut child_best)
            };
            if reduction > 0 && score > alpha {
                // Re-search at full depth: the reduced search only
                // suggested the move might be worth investigating further.
                score = -self.search_node(pos, depth - 1 + extension, ply + 1, -beta, -alpha, child_in_check, &mut child_best);
            }

            pos.undo_move();
            self.root_prev_move = prev_move;

            if self.is_time_up() {
                if bound == Bound::NONE {
                    return 0;
                }
                self.tt.store(pos, ply, depth, *best_move, best_score, bound);
                return best_score;
            }

            if score > best_score {
                best_score = score;
                *best_move = mv;

                if score > alpha {
                    bound |= Bound::LOWER;

                    if score >= beta {
                        if !is_capture_or_promo {
                            self.killers.cutoff(ply as usize, mv);
                            self.history.inc(pos.piece_at(mv.from_sq()), mv.to_sq(), depth as i32);
                            self.counter_moves.cutoff(prev_move, mv);
                        }
                        self.tt.store(pos, ply, depth, mv, score, Bound::LOWER);
                        return score;
                    }

                    alpha = score;
                }
            }
        }

        if best_score == crate::score::SCORE_INVALID {
            return if in_check { mated_in(ply) } else { SCORE_DRAW };
        }

        bound |= Bound::UPPER;
        let _ = orig_alpha;
        self.tt.store(pos, ply, depth, *best_move, best_score, bound);
        best_score
    }

    /// Quiescence search (`searchQNodeInternal`): captures (and, in check,
    /// every evasion) only, with a standing-pat cutoff and a negative-SEE
    /// skip for non-promotion captures.
    fn search_qnode(&mut self, pos: &mut Position, depth: i16, ply: i32, mut alpha: Score, beta: Score, in_check: bool) -> Score {
        if ply as usize >= DEPTH_MAX {
            return evaluate(pos, &mut self.pawns);
        }
        self.nodes += 1;

        if let Some(r) = recognisers::interior_recog(pos, ply, beta, in_check, &self.bitbase) {
            return r.score;
        }

        if !in_check {
            let standing_pat = evaluate(pos, &mut self.pawns);
            if standing_pat >= beta {
                return beta;
            }
            if standing_pat > alpha {
                alpha = standing_pat;
            }
        }

        let moves = quiescence_moves(pos, in_check);
        let mut no_legal_move = true;
        for mv in moves {
            if !in_check && !is_promotion(pos, mv) && see_sign(pos, mv.from_sq(), mv.to_sq()) < 0 {
                continue;
            }
            pos.make_move(mv);
            let child_in_check = pos.in_check();
            let score = -self.search_qnode(pos, depth, ply + 1, -beta, -alpha, child_in_check);
            pos.undo_move();

            if self.is_time_up() {
                return alpha;
            }

            no_legal_move = false;
            if score > alpha {
                alpha = score;
                if score >= beta {
                    return alpha;
                }
            }
        }

        if in_check && no_legal_move {
            return mated_in(ply);
        }
        alpha
    }

    /// A rough necessary (not sufficient) condition for null-move pruning
    /// to be unsafe: side to move is in check, has no non-pawn material, or
    /// has four or fewer pseudo-legal moves counted the way
    /// `searchIsZugzwang` counts them (forward pawn pushes, pawn captures,
    /// then knight/bishop/rook/queen attacks to a non-friendly square).
    /// Matches `examples/original_source/src/search.c`'s `mobilityLimit=4`.
    fn is_zugzwang(&self, pos: &Position, in_check: bool) -> bool {
        let us = pos.turn();
        if in_check || pos.non_pawn_material(us) == 0 {
            return true;
        }

        const MOBILITY_LIMIT: u32 = 4;
        let occ = pos.occupied();
        let not_friendly = !pos.color_bb(us);
        let opp = pos.color_bb(!us);
        let mut mobility: u32 = 0;

        let pawns_forward = pos.piece_bb(us, PieceType::Pawn).forward_one(us);
        mobility += (pawns_forward & !occ).count_bits() as u32;
        if mobility > MOBILITY_LIMIT {
            return false;
        }

        mobility += (pawns_forward.wingify() & opp).count_bits() as u32;
        if mobility > MOBILITY_LIMIT {
            return false;
        }

        for &pt in &[PieceType::Knight, PieceType::BishopLight, PieceType::BishopDark, PieceType::Rook, PieceType::Queen] {
            let mut pieces = pos.piece_bb(us, pt);
            while !pieces.is_empty() {
                let sq = pieces.pop_lsb();
                let attacks = corvid_core::helper::piece_attacks(pt, sq, occ, us) & not_friendly;
                mobility += attacks.count_bits() as u32;
                if mobility > MOBILITY_LIMIT {
                    return false;
                }
            }
        }

        true
    }

    fn is_time_up(&mut self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if self.time.is_expired(self.nodes) {
            self.stop.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }
}

fn is_capture(pos: &Position, mv: Move) -> bool {
    if !pos.piece_at(mv.to_sq()).is_none() {
        return true;
    }
    let from_piece = pos.piece_at(mv.from_sq());
    from_piece.piece_type() == PieceType::Pawn && mv.from_sq().file() != mv.to_sq().file()
}

fn is_promotion(pos: &Position, mv: Move) -> bool {
    let from_piece = pos.piece_at(mv.from_sq());
    from_piece.piece_type() == PieceType::Pawn && mv.to_piece_type() != PieceType::Pawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_mate_in_one() {
        // White to move, Qh5-f7 is mate (Scholar's-mate-adjacent position).
        let mut pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p2Q/4P3/8/PPPP1PPP/RNB1KBNR w KQkq - 2 3").unwrap();
        let mut search = Search::new(1, 1);
        let result = search.iterative_deepening(&mut pos, 3, TimeControl::infinite(), |_, _, _, _, _| {});
        assert!(result.score >= crate::score::SCORE_MATE - 10);
    }

    #[test]
    fn avoids_hanging_a_free_queen() {
        let mut pos = Position::start_pos();
        let mut search = Search::new(1, 1);
        let result = search.iterative_deepening(&mut pos, 2, TimeControl::infinite(), |_, _, _, _, _| {});
        assert_ne!(result.best_move, Move::INVALID);
    }
}
