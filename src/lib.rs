// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod attacks;
pub mod library;
pub mod move_generator;
mod moves;
mod perft;
mod position;
mod puzzle;
pub mod session;
mod types;
pub mod validator;

pub use library::{Filters, LoadError, PuzzleLibrary};
pub use move_generator::{generate_pseudo_legal_moves, MoveVec};
pub use moves::Move;
pub use perft::perft;
pub use position::{
    apply_move, generate_legal_moves, is_checkmate, is_stalemate, piece_at, FenParseError,
    Position,
};
pub use puzzle::{Objective, ObjectiveKind, Puzzle, PuzzleLineMove};
pub use self_test::{run_self_test, run_self_test_with, SelfTestResult};
pub use session::{Attempt, Outcome, Progress, Session};
pub use types::{on_board, BoardSize, BoardSizeError, Color, Piece, PieceKind, Square};
pub use types::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use validator::{validate_all, validate_puzzle, BatchOptions, ValidationReport, ValidationResult};
