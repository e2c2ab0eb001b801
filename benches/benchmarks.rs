// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use criterion::black_box;
use criterion::Criterion;
use minichess::{
    generate_pseudo_legal_moves, perft, validate_puzzle, Color, Position, PuzzleLibrary,
};

const PUZZLES: &str = include_str!("../tests/data/verified_puzzles.json");

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("pseudo-legal moves 8x8 start", |b| {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        b.iter(|| generate_pseudo_legal_moves(black_box(pos.pieces()), pos.size(), Color::White))
    });

    c.bench_function("legal moves 8x8 start", |b| {
        let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        b.iter(|| black_box(&pos).legal_moves(Color::White))
    });

    c.bench_function("perft 5x5 start depth 2", |b| {
        let pos = Position::from_fen("rnbqk/ppppp/5/PPPPP/RNBQK").unwrap();
        b.iter(|| perft(black_box(&pos), Color::White, 2))
    });

    c.bench_function("validate verified puzzles", |b| {
        let library = PuzzleLibrary::from_json_str(PUZZLES).unwrap();
        b.iter(|| {
            for puzzle in library.all() {
                black_box(validate_puzzle(puzzle));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
