//! The move-ordering stage sequence driven by `MovePicker::next`. Keeps the
//! shape of the original stage sketch (TT move, good captures, killer one,
//! killer two, counter move, quiets, bad captures) trimmed to the stages
//! this engine actually uses (no separate evasion/probcut/qsearch stage
//! sets - quiescence uses its own flat capture list in `quiescence_moves`).

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Stage {
    TTMove,
    GoodCaptures,
    KillerOne,
    KillerTwo,
    CounterMove,
    Quiets,
    BadCaptures,
    Done,
}
