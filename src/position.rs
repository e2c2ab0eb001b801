// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Write};

use crate::attacks;
use crate::move_generator::{generate_pseudo_legal_moves, MoveVec};
use crate::moves::Move;
use crate::types::{BoardSize, BoardSizeError, Color, Piece, PieceKind, Square};

/// Possible errors that can arise when parsing a board diagram into a `Position`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FenParseError {
    UnknownPiece(char),
    InvalidDigit(char),
    RankLengthMismatch { rank: usize, expected: u8 },
    InvalidSize(BoardSizeError),
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::UnknownPiece(c) => write!(f, "unknown piece character '{}'", c),
            FenParseError::InvalidDigit(c) => write!(f, "invalid empty-square count '{}'", c),
            FenParseError::RankLengthMismatch { rank, expected } => write!(
                f,
                "rank {} of the diagram does not cover exactly {} squares",
                rank, expected
            ),
            FenParseError::InvalidSize(err) => write!(f, "{}", err),
        }
    }
}

impl Error for FenParseError {}

//
// Free-standing engine operations over a flat piece list. Every function here is pure: inputs
// are never mutated and results are freshly allocated.
//

/// Returns the piece standing on `square`, if any.
pub fn piece_at(pieces: &[Piece], square: Square) -> Option<&Piece> {
    pieces.iter().find(|p| p.is_at(square))
}

/// Applies `mov` to `pieces`, returning the resulting piece list. Any piece on the destination
/// is captured. The mover's kind is replaced by the move's promotion, if it carries one; no
/// promotion is ever inferred. If no piece stands on the source square the pieces are returned
/// unchanged.
pub fn apply_move(pieces: &[Piece], mov: &Move, _size: BoardSize) -> Vec<Piece> {
    let moving_piece = match piece_at(pieces, mov.from) {
        Some(piece) => *piece,
        None => {
            warn!("apply_move: no piece at source square {} ({})", mov.from, mov);
            return pieces.to_vec();
        }
    };

    let mut new_pieces: Vec<Piece> = pieces
        .iter()
        .filter(|p| !p.is_at(mov.to) && !p.is_at(mov.from))
        .cloned()
        .collect();

    let kind = mov.promotion.unwrap_or(moving_piece.kind);
    new_pieces.push(Piece::new(kind, moving_piece.side, mov.to));
    new_pieces
}

/// Generates every legal move for `side`: the pseudo-legal moves that do not leave `side`'s own
/// king attacked once played.
pub fn generate_legal_moves(pieces: &[Piece], size: BoardSize, side: Color) -> MoveVec {
    generate_pseudo_legal_moves(pieces, size, side)
        .into_iter()
        .filter(|mov| {
            let after = apply_move(pieces, mov, size);
            !attacks::is_in_check(&after, side, size)
        })
        .collect()
}

/// True if `side` is in check and has no legal move.
pub fn is_checkmate(pieces: &[Piece], side: Color, size: BoardSize) -> bool {
    attacks::is_in_check(pieces, side, size) && generate_legal_moves(pieces, size, side).is_empty()
}

/// True if `side` is not in check but has no legal move.
pub fn is_stalemate(pieces: &[Piece], side: Color, size: BoardSize) -> bool {
    !attacks::is_in_check(pieces, side, size) && generate_legal_moves(pieces, size, side).is_empty()
}

/// An immutable snapshot of a board: its size and the pieces standing on it. Playing a move
/// never changes a `Position`; it produces a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    size: BoardSize,
    pieces: Vec<Piece>,
}

//
// Board state getters
//

impl Position {
    pub fn new(size: BoardSize, pieces: Vec<Piece>) -> Position {
        Position { size, pieces }
    }

    /// An empty board of the given size.
    pub fn empty(size: BoardSize) -> Position {
        Position::new(size, vec![])
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        piece_at(&self.pieces, square).cloned()
    }

    pub fn king_square(&self, side: Color) -> Option<Square> {
        attacks::king_square(&self.pieces, side)
    }

    /// Returns a copy of this position with `piece` added. Any piece already on that square is
    /// replaced.
    pub fn with_piece(&self, piece: Piece) -> Position {
        let mut pieces: Vec<Piece> = self
            .pieces
            .iter()
            .filter(|p| !p.is_at(piece.square()))
            .cloned()
            .collect();
        pieces.push(piece);
        Position::new(self.size, pieces)
    }
}

//
// Move application and board analysis
//

impl Position {
    pub fn apply_move(&self, mov: &Move) -> Position {
        Position::new(self.size, apply_move(&self.pieces, mov, self.size))
    }

    pub fn legal_moves(&self, side: Color) -> MoveVec {
        generate_legal_moves(&self.pieces, self.size, side)
    }

    /// Legal moves of the piece standing on `square`. Empty if the square is empty.
    pub fn legal_moves_from(&self, square: Square) -> MoveVec {
        let piece = match self.piece_at(square) {
            Some(piece) => piece,
            None => return MoveVec::new(),
        };

        self.legal_moves(piece.side)
            .into_iter()
            .filter(|mov| mov.from == square)
            .collect()
    }

    /// Move legality test. A move is legal if it is exactly one of the moves produced by the
    /// legal move generator, promotion included.
    pub fn is_legal(&self, side: Color, mov: &Move) -> bool {
        self.legal_moves(side).contains(mov)
    }

    pub fn is_square_attacked(&self, square: Square, by_side: Color) -> bool {
        attacks::is_square_attacked(&self.pieces, square, by_side, self.size)
    }

    pub fn is_check(&self, side: Color) -> bool {
        attacks::is_in_check(&self.pieces, side, self.size)
    }

    pub fn is_checkmate(&self, side: Color) -> bool {
        is_checkmate(&self.pieces, side, self.size)
    }

    pub fn is_stalemate(&self, side: Color) -> bool {
        is_stalemate(&self.pieces, side, self.size)
    }
}

//
// Diagram parsing and generation.
//
// Positions can be written with the piece-placement field of FEN, generalized to square boards
// of any supported size: ranks from the top row down, separated by '/', digits for runs of
// empty squares, uppercase letters for White and lowercase for Black. The number of ranks
// determines the board size.
//

impl Position {
    pub fn from_fen<S: AsRef<str>>(fen: S) -> Result<Position, FenParseError> {
        let placement = fen.as_ref().split_whitespace().next().unwrap_or("");
        let ranks: Vec<&str> = placement.split('/').collect();
        let rank_count = u8::try_from(ranks.len()).unwrap_or(std::u8::MAX);
        let size = BoardSize::new(rank_count).map_err(FenParseError::InvalidSize)?;
        let n = size.get();

        let mut pieces = vec![];
        for (i, rank) in ranks.iter().enumerate() {
            let y = n - 1 - i as u8;
            let mut x: u8 = 0;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    if run == 0 || run > u32::from(n) {
                        return Err(FenParseError::InvalidDigit(c));
                    }

                    x += run as u8;
                } else {
                    let kind = PieceKind::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                    let side = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if x < n {
                        pieces.push(Piece::new(kind, side, Square::new(x, y)));
                    }

                    x += 1;
                }

                if x > n {
                    return Err(FenParseError::RankLengthMismatch {
                        rank: i,
                        expected: n,
                    });
                }
            }

            if x != n {
                return Err(FenParseError::RankLengthMismatch {
                    rank: i,
                    expected: n,
                });
            }
        }

        Ok(Position::new(size, pieces))
    }

    pub fn as_fen(&self) -> String {
        let n = self.size.get();
        let mut buf = String::new();
        for y in (0..n).rev() {
            let mut empty_squares = 0;
            for x in 0..n {
                if let Some(piece) = self.piece_at(Square::new(x, y)) {
                    if empty_squares != 0 {
                        let _ = write!(&mut buf, "{}", empty_squares);
                    }
                    buf.push(piece.symbol());
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                let _ = write!(&mut buf, "{}", empty_squares);
            }

            if y != 0 {
                buf.push('/');
            }
        }

        buf
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.size.get();
        for y in (0..n).rev() {
            for x in 0..n {
                if let Some(piece) = self.piece_at(Square::new(x, y)) {
                    write!(f, " {} ", piece.symbol())?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", u32::from(y) + 1)?;
        }

        for _ in 0..n {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for x in 0..n {
            write!(f, " {} ", (b'a' + x) as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
