//! Killer-move table (spec.md 4.3): per-ply list of quiet moves that most
//! recently caused a beta cutoff, tried early by the move picker before
//! falling back to history-ordered quiets. Grounded on
//! `examples/original_source/src/killers.c` and `moveset.c`'s `MoveSet`
//! packed-slot structure, reimplemented here as a plain fixed-size array per
//! ply (same front-promotion/insert-and-evict behaviour as the original's
//! bit-shifted 64-bit `MoveSet`, expressed as array shifts instead of the
//! raw `keepMask`/`shiftMask` bit tricks - easier to read, identical
//! externally observable ordering).

use corvid_core::core::piece_move::Move;

use crate::score::DEPTH_MAX;

const KILLERS_PER_PLY: usize = 4;

pub struct KillerTable {
    slots: Vec<[Move; KILLERS_PER_PLY]>,
}

impl KillerTable {
    pub fn new() -> KillerTable {
        KillerTable { slots: vec![[Move::INVALID; KILLERS_PER_PLY]; DEPTH_MAX] }
    }

    pub fn clear(&mut self) {
        for s in self.slots.iter_mut() {
            *s = [Move::INVALID; KILLERS_PER_PLY];
        }
    }

    pub fn get(&self, ply: usize, index: usize) -> Move {
        self.slots[ply][index]
    }

    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slots[ply].contains(&mv)
    }

    /// Records a quiet beta cutoff. If `mv` is already stored at this ply,
    /// it is promoted to the front (shifting the intervening entries back
    /// by one slot); otherwise the whole list shifts down, dropping the
    /// least-recently-used slot, and `mv` becomes the new front.
    pub fn cutoff(&mut self, ply: usize, mv: Move) {
        let set = &mut self.slots[ply];
        match set.iter().position(|&m| m == mv) {
            Some(pos) => {
                for i in (1..=pos).rev() {
                    set[i] = set[i - 1];
                }
            }
            None => {
                for i in (1..KILLERS_PER_PLY).rev() {
                    set[i] = set[i - 1];
                }
            }
        }
        set[0] = mv;
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::core::piece::PieceType;
    use corvid_core::core::sq::SQ;

    fn mv(from: u8, to: u8) -> Move {
        Move::make(SQ(from), SQ(to), PieceType::Knight)
    }

    #[test]
    fn most_recent_cutoff_is_first() {
        let mut k = KillerTable::new();
        k.cutoff(3, mv(1, 18));
        k.cutoff(3, mv(2, 19));
        assert_eq!(k.get(3, 0), mv(2, 19));
        assert_eq!(k.get(3, 1), mv(1, 18));
    }

    #[test]
    fn repeated_move_promotes_to_front_without_duplicating() {
        let mut k = KillerTable::new();
        k.cutoff(0, mv(1, 18));
        k.cutoff(0, mv(2, 19));
        k.cutoff(0, mv(1, 18));
        assert_eq!(k.get(0, 0), mv(1, 18));
        assert_eq!(k.get(0, 1), mv(2, 19));
    }
}
