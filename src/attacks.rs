// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack and check queries. These are defined entirely in terms of the pseudo-legal move
//! generator, so any change to how pieces move is reflected here as well.
use crate::move_generator::generate_pseudo_legal_moves;
use crate::types::{BoardSize, Color, Piece, PieceKind, Square};

/// Returns true if any pseudo-legal move of `by_side` lands on `square`.
pub fn is_square_attacked(pieces: &[Piece], square: Square, by_side: Color, size: BoardSize) -> bool {
    generate_pseudo_legal_moves(pieces, size, by_side)
        .iter()
        .any(|mov| mov.to == square)
}

/// Returns the square of `side`'s king, if it has one.
pub fn king_square(pieces: &[Piece], side: Color) -> Option<Square> {
    pieces
        .iter()
        .find(|p| p.kind == PieceKind::King && p.side == side)
        .map(|p| p.square())
}

/// Returns true if `side`'s king is attacked. A side without a king is never in check.
pub fn is_in_check(pieces: &[Piece], side: Color, size: BoardSize) -> bool {
    match king_square(pieces, side) {
        Some(king) => is_square_attacked(pieces, king, side.toggle(), size),
        None => false,
    }
}
