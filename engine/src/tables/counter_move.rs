//! Counter-move table (spec.md 4.3): for a given previous move, remembers
//! the quiet reply that most recently refuted it with a beta cutoff. Tried
//! by the move picker right after the killers. Grounded on
//! `examples/original_source/src/countermove.c`, a flat array indexed
//! directly by the packed previous move.

use corvid_core::core::piece_move::Move;

pub struct CounterMoveTable {
    replies: Vec<Move>,
}

impl CounterMoveTable {
    pub fn new() -> CounterMoveTable {
        CounterMoveTable { replies: vec![Move::INVALID; 1 << 16] }
    }

    pub fn clear(&mut self) {
        for m in self.replies.iter_mut() {
            *m = Move::INVALID;
        }
    }

    pub fn get(&self, prev_move: Move) -> Move {
        self.replies[prev_move.0 as usize]
    }

    pub fn cutoff(&mut self, prev_move: Move, response: Move) {
        self.replies[prev_move.0 as usize] = response;
    }
}

impl Default for CounterMoveTable {
    fn default() -> Self {
        CounterMoveTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::core::piece::PieceType;
    use corvid_core::core::sq::SQ;

    #[test]
    fn remembers_the_most_recent_reply() {
        let mut c = CounterMoveTable::new();
        let prev = Move::make(SQ(12), SQ(28), PieceType::Pawn);
        let reply = Move::make(SQ(6), SQ(21), PieceType::Knight);
        assert_eq!(c.get(prev), Move::INVALID);
        c.cutoff(prev, reply);
        assert_eq!(c.get(prev), reply);
    }
}
