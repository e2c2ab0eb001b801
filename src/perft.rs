// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::position::Position;
use crate::types::Color;

/// Counts the leaf nodes of the legal move tree of the given depth, with `side` to move at the
/// root. Used to check the move generator against known totals.
pub fn perft(pos: &Position, side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves(side);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|mov| perft(&pos.apply_move(mov), side.toggle(), depth - 1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::perft;
    use crate::position::Position;
    use crate::types::Color;

    fn perft_test(diagram: &'static str, side: Color, depth: u32, count: u64) {
        let pos = Position::from_fen(diagram).unwrap();
        assert_eq!(count, perft(&pos, side, depth));
    }

    macro_rules! perft_tests {
        () => {};
        ($name:ident ($side:expr, $depth:expr): $diagram:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            fn $name() {
                perft_test($diagram, $side, $depth, $count)
            }

            perft_tests!($($tail)*);
        };

        (skip $name:ident ($side:expr, $depth:expr): $diagram:expr => $count:expr; $($tail:tt)*) => {
            #[test]
            #[ignore]
            fn $name() {
                perft_test($diagram, $side, $depth, $count)
            }

            perft_tests!($($tail)*);
        };
    }

    perft_tests! {
        tiny_1 (Color::White, 1): "4/4/4/K2k" => 3;
        five_1 (Color::White, 1): "rnbqk/ppppp/5/PPPPP/RNBQK" => 7;
        five_2 (Color::White, 2): "rnbqk/ppppp/5/PPPPP/RNBQK" => 53;
        six_1 (Color::White, 1): "rnbqkr/pppppp/6/6/PPPPPP/RNBQKR" => 14;
        six_3 (Color::White, 3): "rnbqkr/pppppp/6/6/PPPPPP/RNBQKR" => 2814;

        start_1 (Color::White, 1): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR" => 20;
        start_2 (Color::White, 2): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR" => 400;
        skip start_3 (Color::White, 3): "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR" => 8902;

        position_3_1 (Color::White, 1): "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8" => 14;
    }
}
