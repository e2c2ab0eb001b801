// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Interactive replay of a puzzle. The solver plays the side that moves first; the puzzle's
//! scripted replies for the other side are played on request. A wrong attempt is reported and
//! counted but never changes the board.
use crate::moves::Move;
use crate::position::Position;
use crate::puzzle::{Puzzle, PuzzleLineMove};
use crate::types::{Color, PieceKind, Square};

/// The result of the solver attempting a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Attempt {
    /// The move is not the next move of the solution. Nothing changed.
    Wrong,
    /// It is not the solver's turn, or the puzzle is already complete. Nothing changed.
    Ignored,
    /// The move was played.
    Accepted(Progress),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// The opponent's scripted reply is next; see `Session::play_reply`.
    ReplyPending,
    YourMove,
    Finished(Outcome),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The whole line was played and the final position is checkmate.
    Solved,
    /// The whole line was played but the final position is not checkmate.
    LineComplete,
}

/// One row of the move list: a move number with White's and Black's moves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub move_number: u32,
    pub white: Option<String>,
    pub black: Option<String>,
}

#[derive(Clone, Debug)]
struct Snapshot {
    position: Position,
    side_to_move: Color,
    line_index: usize,
}

#[derive(Clone, Debug)]
pub struct Session<'a> {
    puzzle: &'a Puzzle,
    position: Position,
    side_to_move: Color,
    line_index: usize,
    history: Vec<Snapshot>,
    attempts: u32,
}

impl<'a> Session<'a> {
    pub fn new(puzzle: &'a Puzzle) -> Session<'a> {
        Session {
            puzzle,
            position: puzzle.start_position(),
            side_to_move: puzzle.side_to_move_first,
            line_index: 0,
            history: vec![],
            attempts: 0,
        }
    }

    pub fn puzzle(&self) -> &'a Puzzle {
        self.puzzle
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn solver(&self) -> Color {
        self.puzzle.side_to_move_first
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Number of wrong attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_complete(&self) -> bool {
        self.line_index >= self.puzzle.line.len()
    }

    fn next_line_move(&self) -> Option<&'a PuzzleLineMove> {
        self.puzzle.line.get(self.line_index)
    }

    /// The square of the side to move's king, if that king is in check.
    pub fn checked_king(&self) -> Option<Square> {
        if self.position.is_check(self.side_to_move) {
            self.position.king_square(self.side_to_move)
        } else {
            None
        }
    }

    /// Destinations reachable by the side to move's piece on `square`. Empty if the square is
    /// empty or holds an opponent piece.
    pub fn legal_targets(&self, square: Square) -> Vec<Square> {
        match self.position.piece_at(square) {
            Some(piece) if piece.side == self.side_to_move => {}
            _ => return vec![],
        }

        let mut targets: Vec<Square> = self
            .position
            .legal_moves_from(square)
            .into_iter()
            .map(|m| m.to)
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Attempts a solver move. A missing promotion is taken from the solution; a given
    /// promotion must match it.
    pub fn attempt(&mut self, from: Square, to: Square, promotion: Option<PieceKind>) -> Attempt {
        let expected = match self.next_line_move() {
            Some(expected) => expected,
            None => return Attempt::Ignored,
        };

        if self.reply_pending() {
            return Attempt::Ignored;
        }

        let promotion_ok = promotion.is_none() || promotion == expected.promotion;
        let mov = Move {
            from,
            to,
            promotion: expected.promotion,
        };
        let correct = expected.side == self.side_to_move
            && expected.from == from
            && expected.to == to
            && promotion_ok
            && self.position.is_legal(self.side_to_move, &mov);
        if !correct {
            self.attempts += 1;
            debug!(
                "{}: wrong attempt {}-{} (attempt {})",
                self.puzzle.id, from, to, self.attempts
            );
            return Attempt::Wrong;
        }

        self.play(mov);
        Attempt::Accepted(self.progress())
    }

    /// True when the next move of the solution belongs to the opponent.
    pub fn reply_pending(&self) -> bool {
        match self.next_line_move() {
            Some(next) => next.side != self.solver(),
            None => false,
        }
    }

    /// Plays the opponent's scripted reply. Returns `None` if no reply is pending.
    pub fn play_reply(&mut self) -> Option<Progress> {
        if !self.reply_pending() {
            return None;
        }

        let reply = self.next_line_move()?.as_move();
        self.play(reply);
        Some(self.progress())
    }

    fn play(&mut self, mov: Move) {
        debug!("{}: playing {}", self.puzzle.id, mov);
        self.history.push(Snapshot {
            position: self.position.clone(),
            side_to_move: self.side_to_move,
            line_index: self.line_index,
        });
        self.position = self.position.apply_move(&mov);
        self.side_to_move = self.side_to_move.toggle();
        self.line_index += 1;

        match self.outcome() {
            Some(Outcome::Solved) => info!("{}: solved", self.puzzle.id),
            Some(Outcome::LineComplete) => {
                warn!("{}: line complete but not checkmate", self.puzzle.id)
            }
            None => {}
        }
    }

    fn progress(&self) -> Progress {
        if let Some(outcome) = self.outcome() {
            return Progress::Finished(outcome);
        }

        if self.reply_pending() {
            Progress::ReplyPending
        } else {
            Progress::YourMove
        }
    }

    /// The outcome once the line is complete, `None` before.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_complete() {
            return None;
        }

        if self.position.is_checkmate(self.side_to_move) {
            Some(Outcome::Solved)
        } else {
            Some(Outcome::LineComplete)
        }
    }

    /// Takes back moves until it is the solver's turn again. Returns false if there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let mut restored = false;
        while let Some(snapshot) = self.history.pop() {
            self.position = snapshot.position;
            self.side_to_move = snapshot.side_to_move;
            self.line_index = snapshot.line_index;
            restored = true;
            if self.side_to_move == self.solver() {
                break;
            }
        }

        restored
    }

    /// Returns to the starting position. Wrong attempts are still counted.
    pub fn restart(&mut self) {
        self.position = self.puzzle.start_position();
        self.side_to_move = self.puzzle.side_to_move_first;
        self.line_index = 0;
        self.history.clear();
    }

    pub fn hint(&self) -> String {
        let next = match self.next_line_move() {
            Some(next) => next,
            None => return "Puzzle complete!".to_owned(),
        };

        if next.side != self.side_to_move || self.reply_pending() {
            return "Wait for opponent move".to_owned();
        }

        let piece_name = self
            .position
            .piece_at(next.from)
            .map(|p| p.kind.name())
            .unwrap_or("Piece");
        format!("Try moving {} from {} to {}", piece_name, next.from, next.to)
    }

    /// The moves played so far, grouped into numbered White/Black pairs.
    pub fn history(&self) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = vec![];
        let mut move_number = 1;
        for line_move in &self.puzzle.line[..self.line_index] {
            let text = line_move.notation();
            match line_move.side {
                Color::White => entries.push(HistoryEntry {
                    move_number,
                    white: Some(text),
                    black: None,
                }),
                Color::Black => {
                    match entries.last_mut() {
                        Some(last) if last.move_number == move_number && last.black.is_none() => {
                            last.black = Some(text)
                        }
                        _ => entries.push(HistoryEntry {
                            move_number,
                            white: None,
                            black: Some(text),
                        }),
                    }

                    move_number += 1;
                }
            }
        }

        entries
    }
}
