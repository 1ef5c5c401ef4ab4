#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use corvid_core::Position;
use corvid_engine::search::Search;
use corvid_engine::time::TimeControl;

fn search_startpos_depth(depth: i16) {
    let mut pos = Position::start_pos();
    let mut search = Search::new(16, 4);
    let result = search.iterative_deepening(&mut pos, depth, TimeControl::infinite(), |_, _, _, _, _| {});
    black_box(result.best_move);
}

fn bench_search_depth_5(c: &mut Criterion) {
    c.bench_function("search startpos to depth 5", |b| b.iter(|| search_startpos_depth(5)));
}

fn bench_perft_5(c: &mut Criterion) {
    c.bench_function("perft startpos depth 5", |b| {
        b.iter(|| {
            let mut pos = Position::start_pos();
            black_box(corvid_core::board::perft::perft(&mut pos, 5));
        })
    });
}

criterion_group!(benches, bench_search_depth_5, bench_perft_5);
criterion_main!(benches);
