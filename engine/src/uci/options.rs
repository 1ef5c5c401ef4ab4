//! UCI `setoption` handling (spec.md 6): `Hash`, `Clear Hash`, `Ponder`.
//! Grounded on the teacher's `OptionsMap`/`UCIOption` trait-object design,
//! trimmed to the concrete option set this engine exposes (no `Threads`:
//! SPEC_FULL.md 5's single-worker model has none to configure) and
//! simplified to apply directly rather than queueing deferred `OptionWork`,
//! since every option here is only ever touched between searches (the UCI
//! loop waits on `ready` before `setoption` is handled).

use crate::engine::EngineHandle;

pub const DEFAULT_HASH_MB: usize = 16;
const MAX_HASH_MB: usize = 32 * 1024;

pub struct OptionsMap {
    pub hash_mb: usize,
    pub ponder: bool,
}

impl OptionsMap {
    pub fn new() -> OptionsMap {
        OptionsMap { hash_mb: DEFAULT_HASH_MB, ponder: false }
    }

    pub fn print_all(&self) {
        println!("option name Hash type spin default {} min 1 max {}", DEFAULT_HASH_MB, MAX_HASH_MB);
        println!("option name Clear Hash type button");
        println!("option name Ponder type check default false");
    }

    /// Applies one `setoption` pair, forwarding table-affecting changes to
    /// the worker via `handle`. Unknown option names/values are silently
    /// ignored (spec.md 7).
    pub fn apply(&mut self, name: &str, value: &str, handle: EngineHandle) {
        match name {
            "Hash" => {
                if let Ok(mb) = value.parse::<usize>() {
                    self.hash_mb = mb.clamp(1, MAX_HASH_MB);
                    handle.resize_hash(self.hash_mb);
                }
            }
            "Clear Hash" => handle.clear_hash(),
            "Ponder" => {
                if let Ok(b) = value.parse::<bool>() {
                    self.ponder = b;
                }
            }
            _ => {}
        }
    }
}

impl Default for OptionsMap {
    fn default() -> Self {
        OptionsMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sixteen_megabytes() {
        assert_eq!(OptionsMap::new().hash_mb, DEFAULT_HASH_MB);
    }
}
