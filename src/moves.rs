// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a Move.
//!
//! A move is identified by its source square, its destination square and, for pawns reaching
//! their last rank, the piece being promoted to. The promotion is part of a move's identity:
//! a pawn arriving on its last rank produces four distinct moves, and a move to the last rank
//! without a promotion is never legal. Nothing in this crate fills in a promotion that was
//! left out.
use std::convert::TryFrom;
use std::fmt;

use crate::types::{PieceKind, Square};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default, alias = "promo", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Constructs a move that does not promote.
    pub fn quiet(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    /// Constructs a pawn move that promotes to the given piece.
    pub fn promotion(from: Square, to: Square, kind: PieceKind) -> Move {
        Move {
            from,
            to,
            promotion: Some(kind),
        }
    }

    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Parses a move in coordinate notation, e.g. `a4e4` or `b7b8q`.
    pub fn from_uci(move_str: &str) -> Option<Move> {
        let chrs: Vec<char> = move_str.trim().chars().collect();
        if chrs.len() != 4 && chrs.len() != 5 {
            return None;
        }

        let from = parse_square(chrs[0], chrs[1])?;
        let to = parse_square(chrs[2], chrs[3])?;
        if chrs.len() == 5 {
            let kind = PieceKind::try_from(chrs[4]).ok()?;
            if !kind.is_promotion_target() {
                return None;
            }

            return Some(Move::promotion(from, to, kind));
        }

        Some(Move::quiet(from, to))
    }
}

fn parse_square(file: char, rank: char) -> Option<Square> {
    if !file.is_ascii_lowercase() {
        return None;
    }

    let rank = rank.to_digit(10)?;
    if rank == 0 {
        return None;
    }

    Some(Square::new(file as u8 - b'a', (rank - 1) as u8))
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}
