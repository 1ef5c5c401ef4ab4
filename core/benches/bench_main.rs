#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use corvid_core::board::perft::perft;
use corvid_core::Position;

fn bench_perft_startpos_depth_4(c: &mut Criterion) {
    c.bench_function("perft startpos depth 4", |b| {
        b.iter(|| {
            let mut pos = Position::start_pos();
            black_box(perft(&mut pos, 4));
        })
    });
}

fn bench_legal_movegen_startpos(c: &mut Criterion) {
    c.bench_function("generate legal moves at startpos", |b| {
        b.iter(|| {
            let mut pos = Position::start_pos();
            black_box(pos.generate_legal_moves());
        })
    });
}

fn bench_make_unmake_move(c: &mut Criterion) {
    c.bench_function("make and undo one move", |b| {
        b.iter(|| {
            let mut pos = Position::start_pos();
            let mv = pos.generate_legal_moves().iter().copied().next().unwrap();
            pos.make_move(mv);
            pos.undo_move();
        })
    });
}

criterion_group!(
    benches,
    bench_perft_startpos_depth_4,
    bench_legal_movegen_startpos,
    bench_make_unmake_move
);
criterion_main!(benches);
