//! Move-ordering auxiliary tables used by the search (spec.md 4.3): the
//! transposition table lives in `crate::tt` since it also drives search
//! control flow (mate-distance pruning, PV extraction), while the tables
//! here are pure move-ordering heuristics consulted by `crate::movepick`.

pub mod counter_move;
pub mod history;
pub mod killers;
