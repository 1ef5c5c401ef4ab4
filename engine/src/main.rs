//! UCI binary entry point (SPEC_FULL.md 6). Initialises the global
//! precomputed tables (magic attacks, Zobrist keys - both lazily built by
//! `corvid_core` on first use) and the KPvK bitbase, then hands off to the
//! UCI loop. Grounded on `examples/original_source/src/main.c`'s
//! `main()`/`BitbaseInit()` startup sequence.

fn main() {
    // Force the bitbase to build now rather than on the first `go`, so a
    // fatal allocation failure is reported before any GUI traffic begins
    // (spec.md 7's "startup allocation failures are fatal"). The release
    // profile aborts on panic, so a failure here prints the default
    // diagnostic to stderr and exits nonzero on its own.
    let _ = corvid_engine::bitbase::Bitbase::generate();

    corvid_engine::uci::run();
}
