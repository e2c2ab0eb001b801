// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Puzzle records as they appear in the content dataset. Records are read once and never
//! mutated; validators and play sessions take their own working copies of the pieces.
use std::fmt;

use crate::moves::Move;
use crate::position::Position;
use crate::types::{BoardSize, Color, Piece, PieceKind, Square};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectiveKind {
    #[serde(rename = "mate")]
    Mate,
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ObjectiveKind::Mate => write!(f, "mate"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(alias = "type")]
    pub kind: ObjectiveKind,
    /// Number of moves the solving side makes, e.g. 2 for a mate in two.
    pub depth: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Objective {
    pub fn mate_in(depth: u32) -> Objective {
        Objective {
            kind: ObjectiveKind::Mate,
            depth,
            note: None,
        }
    }
}

/// One ply of a puzzle's solution, annotated with the side expected to play it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleLineMove {
    pub side: Color,
    pub from: Square,
    pub to: Square,
    #[serde(default, alias = "promo", skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
}

impl PuzzleLineMove {
    pub fn new(side: Color, mov: Move) -> PuzzleLineMove {
        PuzzleLineMove {
            side,
            from: mov.from,
            to: mov.to,
            promotion: mov.promotion,
        }
    }

    pub fn as_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// The move written as `from-to`, with `=X` appended for promotions.
    pub fn notation(&self) -> String {
        let mut text = format!("{}-{}", self.from, self.to);
        if let Some(kind) = self.promotion {
            text.push('=');
            text.push(kind.to_char().to_ascii_uppercase());
        }

        text
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pack: String,
    pub size: BoardSize,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(alias = "turn")]
    pub side_to_move_first: Color,
    pub pieces: Vec<Piece>,
    pub objective: Objective,
    pub line: Vec<PuzzleLineMove>,
}

fn default_difficulty() -> u8 {
    1
}

impl Puzzle {
    /// The starting position, as a fresh copy of the puzzle's pieces.
    pub fn start_position(&self) -> Position {
        Position::new(self.size, self.pieces.clone())
    }

    /// The number of plies a mate of the declared depth takes: the solver's moves plus the
    /// replies between them.
    pub fn expected_line_length(&self) -> usize {
        match self.objective.kind {
            ObjectiveKind::Mate => (self.objective.depth as usize * 2).saturating_sub(1),
        }
    }
}
