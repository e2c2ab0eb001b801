// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Puzzle validation. A puzzle is validated by replaying its solution line against the rules
//! engine from the starting position: every move must be legal for the side to move, and the
//! final position must satisfy the puzzle's objective.
//!
//! Validation never panics on bad content. Every problem found is reported as an error string
//! on the puzzle's `ValidationResult`, and the replay stops at the first illegal move.
use std::io;

use csv::Writer;
use hashbrown::HashSet;
use rayon::prelude::*;

use crate::moves::Move;
use crate::position::Position;
use crate::puzzle::{ObjectiveKind, Puzzle};
use crate::self_test::{self, SelfTestResult};
use crate::types::{Color, PieceKind, Square, COLORS};

/// The outcome of validating a single puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub puzzle_id: String,
    pub passed: bool,
    pub errors: Vec<String>,

    /// Index into the puzzle's line of the first move that could not be played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_move_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_move_from: Option<Square>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_move_to: Option<Square>,

    /// The legal moves from the failing move's source square, when the move was illegal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_moves_at_failure: Option<Vec<Move>>,
}

impl ValidationResult {
    fn new(puzzle_id: &str) -> ValidationResult {
        ValidationResult {
            puzzle_id: puzzle_id.to_owned(),
            passed: false,
            errors: vec![],
            failing_move_index: None,
            failing_move_from: None,
            failing_move_to: None,
            legal_moves_at_failure: None,
        }
    }

    fn fail_at(&mut self, index: usize, from: Square, to: Square, error: String) {
        self.errors.push(error);
        self.failing_move_index = Some(index);
        self.failing_move_from = Some(from);
        self.failing_move_to = Some(to);
    }

    fn finish(mut self) -> ValidationResult {
        self.passed = self.errors.is_empty();
        self
    }
}

/// Validates a single puzzle by replaying its line.
pub fn validate_puzzle(puzzle: &Puzzle) -> ValidationResult {
    let mut result = ValidationResult::new(&puzzle.id);
    check_start_position(puzzle, &mut result.errors);
    if !result.errors.is_empty() {
        return result.finish();
    }

    let mut pos = puzzle.start_position();
    let mut side = puzzle.side_to_move_first;
    for (index, line_move) in puzzle.line.iter().enumerate() {
        let mov = line_move.as_move();
        if line_move.side != side {
            let error = format!(
                "Move {}: expected side {}, got {}",
                index, side, line_move.side
            );
            result.fail_at(index, mov.from, mov.to, error);
            break;
        }

        let piece = match pos.piece_at(mov.from) {
            Some(piece) => piece,
            None => {
                let error = format!("Move {}: no piece at from square {}", index, mov.from);
                result.fail_at(index, mov.from, mov.to, error);
                break;
            }
        };

        if piece.side != side {
            let error = format!(
                "Move {}: piece at {} is {}, expected {}",
                index, mov.from, piece.side, side
            );
            result.fail_at(index, mov.from, mov.to, error);
            break;
        }

        // Recomputed at every ply; moves are never checked against a stale list.
        let legal_from_square: Vec<Move> = pos
            .legal_moves(side)
            .into_iter()
            .filter(|m| m.from == mov.from)
            .collect();

        if !legal_from_square.contains(&mov) {
            let error = format!(
                "Move {}: illegal move {} for {}; legal moves from {}: {}",
                index,
                line_move.notation(),
                piece,
                mov.from,
                format_moves(&legal_from_square)
            );
            result.fail_at(index, mov.from, mov.to, error);
            result.legal_moves_at_failure = Some(legal_from_square);
            break;
        }

        debug!("{}: move {} {} ok", puzzle.id, index, mov);
        pos = pos.apply_move(&mov);
        side = side.toggle();
    }

    if !result.errors.is_empty() {
        return result.finish();
    }

    let expected = puzzle.expected_line_length();
    if puzzle.line.len() != expected {
        warn!(
            "{}: line has {} moves, a {} in {} takes {}",
            puzzle.id,
            puzzle.line.len(),
            puzzle.objective.kind,
            puzzle.objective.depth,
            expected
        );
    }

    match puzzle.objective.kind {
        ObjectiveKind::Mate => {
            if let Some(error) = check_final_mate(&pos, side) {
                result.errors.push(error);
            }
        }
    }

    result.finish()
}

/// Structural checks on the starting position. Any error here prevents the replay.
fn check_start_position(puzzle: &Puzzle, errors: &mut Vec<String>) {
    for &side in &COLORS {
        let kings = puzzle
            .pieces
            .iter()
            .filter(|p| p.kind == PieceKind::King && p.side == side)
            .count();
        if kings != 1 {
            errors.push(format!(
                "Expected 1 {} king, found {}",
                side.name().to_lowercase(),
                kings
            ));
        }
    }

    let mut occupied = HashSet::new();
    for piece in &puzzle.pieces {
        let square = piece.square();
        if !square.is_on(puzzle.size) {
            errors.push(format!("{} is off the {} board", piece, puzzle.size));
        } else if !occupied.insert(square) {
            errors.push(format!("Two pieces on {}", square));
        }
    }
}

/// Returns an error describing why `side` is not checkmated, or None if it is.
fn check_final_mate(pos: &Position, side: Color) -> Option<String> {
    let legal = pos.legal_moves(side);
    let in_check = pos.is_check(side);
    if in_check && legal.is_empty() {
        return None;
    }

    let name = side.name();
    if !in_check {
        if legal.is_empty() {
            return Some(format!("Final position: {} is stalemated, not checkmated", name));
        }

        return Some(format!("Final position: {} is not in check", name));
    }

    let escape_from = legal[0].from;
    let escapes: Vec<Move> = legal
        .iter()
        .filter(|m| m.from == escape_from)
        .cloned()
        .collect();
    let escaping_piece = pos
        .piece_at(escape_from)
        .map(|p| p.kind.name())
        .unwrap_or("piece");
    Some(format!(
        "Final position: {} is in check but not mated; {} on {} can play {}",
        name,
        escaping_piece,
        escape_from,
        format_moves(&escapes)
    ))
}

fn format_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return "none".to_owned();
    }

    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Options controlling a batch validation run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Runs the move generator self-test before validating. Outside dev mode the self-test is
    /// reported as skipped.
    pub dev_mode: bool,

    /// Validates puzzles on the rayon thread pool.
    pub parallel: bool,
}

/// The outcome of validating a batch of puzzles. Results are in the same order as the input.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub self_test: SelfTestResult,
    pub total_puzzles: usize,
    pub passed_puzzles: usize,
    pub failed_puzzles: usize,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn result_for(&self, puzzle_id: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.puzzle_id == puzzle_id)
    }

    pub fn all_passed(&self) -> bool {
        self.passed_puzzles == self.total_puzzles
    }

    /// False if the self-test ran and failed, in which case none of the per-puzzle results can
    /// be relied on.
    pub fn is_trustworthy(&self) -> bool {
        !self.self_test.ran || self.self_test.passed
    }

    /// Writes one CSV row per puzzle.
    /// The report as pretty-printed JSON, as written by `minichess validate --json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = Writer::from_writer(writer);
        for result in &self.results {
            writer.serialize(ReportRow::from(result))?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ReportRow<'a> {
    puzzle_id: &'a str,
    passed: bool,
    failing_move_index: Option<usize>,
    failing_move: String,
    errors: String,
}

impl<'a> From<&'a ValidationResult> for ReportRow<'a> {
    fn from(result: &'a ValidationResult) -> ReportRow<'a> {
        let failing_move = match (result.failing_move_from, result.failing_move_to) {
            (Some(from), Some(to)) => format!("{}-{}", from, to),
            _ => String::new(),
        };

        ReportRow {
            puzzle_id: &result.puzzle_id,
            passed: result.passed,
            failing_move_index: result.failing_move_index,
            failing_move,
            errors: result.errors.join("; "),
        }
    }
}

/// Validates every puzzle in `puzzles`.
pub fn validate_all(puzzles: &[Puzzle], options: &BatchOptions) -> ValidationReport {
    info!("validating {} puzzles", puzzles.len());
    let self_test = if options.dev_mode {
        self_test::run_self_test()
    } else {
        debug!("self-test skipped outside dev mode");
        SelfTestResult::skipped()
    };

    let results: Vec<ValidationResult> = if options.parallel {
        puzzles.par_iter().map(validate_puzzle).collect()
    } else {
        puzzles.iter().map(validate_puzzle).collect()
    };

    for result in &results {
        if result.passed {
            debug!("puzzle {} passed", result.puzzle_id);
            continue;
        }

        error!("puzzle {} FAILED:", result.puzzle_id);
        for err in &result.errors {
            error!("  - {}", err);
        }
    }

    let passed_puzzles = results.iter().filter(|r| r.passed).count();
    info!("validation complete, passed {}/{}", passed_puzzles, puzzles.len());
    ValidationReport {
        self_test,
        total_puzzles: puzzles.len(),
        passed_puzzles,
        failed_puzzles: puzzles.len() - passed_puzzles,
        results,
    }
}
