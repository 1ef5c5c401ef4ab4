//! Move generation (spec.md 4.2): pawn pushes/captures/promotions/en
//! passant, knight/bishop/rook/queen/king steps, and castling, all as
//! pseudo-legal moves; `Position::generate_legal_moves` then filters with a
//! make/unmake + king-attacked check. Grounded on
//! `pleco::board::movegen`'s per-piece-type generation shape, simplified
//! to a single make/unmake legality filter rather than the teacher's
//! pin-aware generator - see DESIGN.md for that trade-off.

use super::castle_rights::CastleType;
use super::{bishop_type_for_square, Position};
use crate::core::masks::{RANK_1, RANK_2, RANK_7, RANK_8};
use crate::core::move_list::MoveList;
use crate::core::piece::PieceType;
use crate::core::piece_move::Move;
use crate::core::sq::SQ;
use crate::core::{BitBoard, GenType, Player};
use crate::core::bitboard::between;
use crate::helper::piece_attacks;

const PROMO_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Knight,
    PieceType::BishopLight, // placeholder, replaced by square colour below
];

impl Position {
    /// All pseudo-legal moves matching `gen_type`: may leave the side to
    /// move's own king in check, and castling moves are only checked for
    /// clear/unattacked transit squares, not full legality.
    pub fn generate_pseudo_legal_moves(&self, gen_type: GenType) -> MoveList {
        let mut list = MoveList::new();
        let us = self.turn();
        self.gen_pawn_moves(us, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::Knight, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::BishopLight, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::BishopDark, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::Rook, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::Queen, gen_type, &mut list);
        self.gen_piece_moves(us, PieceType::King, gen_type, &mut list);
        if gen_type != GenType::Captures {
            self.gen_castles(us, &mut list);
        }
        list
    }

    /// Pseudo-legal moves filtered to those that do not leave the mover's
    /// own king in check, via make/unmake (spec.md 4.2's legality test).
    pub fn generate_legal_moves(&mut self) -> MoveList {
        let pseudo = self.generate_pseudo_legal_moves(GenType::All);
        let mover = self.turn();
        let mut legal = MoveList::new();
        for mv in pseudo.iter().copied() {
            self.make_move(mv);
            let still_in_check = self.in_check_player(mover);
            self.undo_move();
            if !still_in_check {
                legal.push(mv);
            }
        }
        legal
    }

    pub fn is_mate(&mut self) -> bool {
        self.in_check() && self.generate_legal_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && self.generate_legal_moves().is_empty()
    }

    fn gen_piece_moves(&self, us: Player, pt: PieceType, gen_type: GenType, list: &mut MoveList) {
        let mut sources = self.piece_bb(us, pt);
        let own = self.color_bb(us);
        let enemy = self.color_bb(!us);
        while !sources.is_empty() {
            let from = sources.pop_lsb();
            let mut targets = piece_attacks(pt, from, self.occupied(), us) & !own;
            targets = match gen_type {
                GenType::Captures => targets & enemy,
                GenType::Quiets => targets & !enemy,
                GenType::All => targets,
            };
            while !targets.is_empty() {
                let to = targets.pop_lsb();
                list.push(Move::make(from, to, pt));
            }
        }
    }

    fn gen_pawn_moves(&self, us: Player, gen_type: GenType, list: &mut MoveList) {
        let pawns = self.piece_bb(us, PieceType::Pawn);
        let enemy = self.color_bb(!us);
        let empty = !self.occupied();
        let promo_rank_mask = if us == Player::White { RANK_8 } else { RANK_1 };
        let start_rank_mask = if us == Player::White { RANK_2 } else { RANK_7 };

        if gen_type != GenType::Captures {
            let single = pawns.forward_one(us) & empty;
            let mut single_targets = single;
            while !single_targets.is_empty() {
                let to = single_targets.pop_lsb();
                let from = SQ(if us == Player::White { to.0 - 8 } else { to.0 + 8 });
                self.push_pawn_move(from, to, promo_rank_mask, list);
            }

            let double_sources = pawns & BitBoard(start_rank_mask);
            let double_single_step = double_sources.forward_one(us) & empty;
            let double_targets = double_single_step.forward_one(us) & empty;
            let mut dt = double_targets;
            while !dt.is_empty() {
                let to = dt.pop_lsb();
                let from = SQ(if us == Player::White { to.0 - 16 } else { to.0 + 16 });
                list.push(Move::make(from, to, PieceType::Pawn));
            }
        }

        if gen_type != GenType::Quiets {
            let mut sources = pawns;
            while !sources.is_empty() {
                let from = sources.pop_lsb();
                let attacks = crate::helper::pawn_attacks_from(from, us);
                let mut captures = attacks & enemy;
                while !captures.is_empty() {
                    let to = captures.pop_lsb();
                    self.push_pawn_move(from, to, promo_rank_mask, list);
                }
                if self.ep_square().is_okay() && attacks.contains(self.ep_square()) {
                    list.push(Move::make(from, self.ep_square(), PieceType::Pawn));
                }
            }
        }
    }

    fn push_pawn_move(&self, from: SQ, to: SQ, promo_rank_mask: u64, list: &mut MoveList) {
        if to.as_bitboard() & promo_rank_mask != 0 {
            for &promo in PROMO_PIECES.iter() {
                let pt = if promo == PieceType::BishopLight {
                    bishop_type_for_square(to)
                } else {
                    promo
                };
                list.push(Move::make(from, to, pt));
            }
        } else {
            list.push(Move::make(from, to, PieceType::Pawn));
        }
    }

    fn gen_castles(&self, us: Player, list: &mut MoveList) {
        if self.in_check() {
            return;
        }
        let rank = if us == Player::White { 0u8 } else { 56u8 };
        let king_from = SQ(rank + 4);
        if self.castling().castle_rights(us, CastleType::KingSide) {
            let rook_sq = SQ(rank + 7);
            let king_to = SQ(rank + 6);
            if between(king_from, rook_sq).is_empty() && self.castle_path_clear(king_from, king_to, !us) {
                list.push(Move::make(king_from, king_to, PieceType::King));
            }
        }
        if self.castling().castle_rights(us, CastleType::QueenSide) {
            let rook_sq = SQ(rank);
            let king_to = SQ(rank + 2);
            if between(king_from, rook_sq).is_empty() && self.castle_path_clear(king_from, king_to, !us) {
                list.push(Move::make(king_from, king_to, PieceType::King));
            }
        }
    }

    /// King's transit squares (inclusive of `to`) must be unoccupied and
    /// unattacked; the squares the rook crosses only need to be clear,
    /// which `gen_castles` already checked via `between`.
    fn castle_path_clear(&self, from: SQ, to: SQ, enemy: Player) -> bool {
        let lo = from.0.min(to.0);
        let hi = from.0.max(to.0);
        for sq_idx in lo..=hi {
            let sq = SQ(sq_idx);
            if sq != from && self.occupied().contains(sq) {
                return false;
            }
            if self.is_attacked_by(sq, enemy) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn start_pos_has_twenty_legal_moves() {
        let mut pos = Position::start_pos();
        assert_eq!(pos.generate_legal_moves().len(), 20);
    }

    #[test]
    fn kiwipete_has_expected_legal_move_count() {
        let mut pos = Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(pos.generate_legal_moves().len(), 48);
    }

    #[test]
    fn pinned_knight_has_no_legal_moves() {
        let mut pos = Position::from_fen("4k3/8/8/8/3r4/8/3N4/3K4 w - - 0 1").unwrap();
        let moves = pos.generate_legal_moves();
        assert!(!moves.iter().any(|mv| mv.from_sq() == SQ(11)));
    }

    #[test]
    fn castling_blocked_when_transit_square_attacked() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/5r2/8/4K2R w K - 0 1").unwrap();
        let moves = pos.generate_legal_moves();
        assert!(!moves.iter().any(|mv| mv.is_castle()));
    }
}
