// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{self, Display, Write};

pub const MIN_BOARD_SIZE: u8 = 4;
pub const MAX_BOARD_SIZE: u8 = 8;

/// Error produced when a board size falls outside of the supported range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardSizeError(pub u8);

impl Display for BoardSizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "board size {} is outside of the supported range {}..={}",
            self.0, MIN_BOARD_SIZE, MAX_BOARD_SIZE
        )
    }
}

impl Error for BoardSizeError {}

/// The side length of a square board. Only sizes in `MIN_BOARD_SIZE..=MAX_BOARD_SIZE` can be
/// constructed, so every component downstream can assume a well-formed board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(u8);

impl BoardSize {
    pub fn new(size: u8) -> Result<BoardSize, BoardSizeError> {
        if size < MIN_BOARD_SIZE || size > MAX_BOARD_SIZE {
            return Err(BoardSizeError(size));
        }

        Ok(BoardSize(size))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = BoardSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BoardSize::new(value)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> u8 {
        size.0
    }
}

impl Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// Bounds check shared by every component that walks the board.
pub fn on_board(x: i32, y: i32, size: BoardSize) -> bool {
    let n = i32::from(size.get());
    x >= 0 && x < n && y >= 0 && y < n
}

/// A board coordinate. `x` is the column, `y` is the row, and `(0, 0)` is the bottom-left
/// square from White's point of view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    pub const fn new(x: u8, y: u8) -> Square {
        Square { x, y }
    }

    pub fn is_on(self, size: BoardSize) -> bool {
        on_board(i32::from(self.x), i32::from(self.y), size)
    }

    /// Returns the square `(dx, dy)` away from this one, or `None` if it lies off the board.
    pub fn offset(self, dx: i32, dy: i32, size: BoardSize) -> Option<Square> {
        let x = i32::from(self.x) + dx;
        let y = i32::from(self.y) + dy;
        if !on_board(x, y, size) {
            return None;
        }

        Some(Square::new(x as u8, y as u8))
    }
}

impl From<(u8, u8)> for Square {
    fn from((x, y): (u8, u8)) -> Square {
        Square::new(x, y)
    }
}

impl From<Square> for (u8, u8) {
    fn from(sq: Square) -> (u8, u8) {
        (sq.x, sq.y)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.x < 26 {
            f.write_char((b'a' + self.x) as char)?;
            write!(f, "{}", u32::from(self.y) + 1)
        } else {
            write!(f, "[{}, {}]", self.x, self.y)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "w", alias = "white", alias = "White")]
    White,
    #[serde(rename = "b", alias = "black", alias = "Black")]
    Black,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }

    /// Row delta of a single pawn push.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The row from which this side's pawns may advance two squares.
    pub fn pawn_start_rank(self, size: BoardSize) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => size.get() - 2,
        }
    }

    /// The row on which this side's pawns promote.
    pub fn last_rank(self, size: BoardSize) -> u8 {
        match self {
            Color::White => size.get() - 1,
            Color::Black => 0,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "K", alias = "king", alias = "King")]
    King,
    #[serde(rename = "Q", alias = "queen", alias = "Queen")]
    Queen,
    #[serde(rename = "R", alias = "rook", alias = "Rook")]
    Rook,
    #[serde(rename = "B", alias = "bishop", alias = "Bishop")]
    Bishop,
    #[serde(rename = "N", alias = "knight", alias = "Knight")]
    Knight,
    #[serde(rename = "P", alias = "pawn", alias = "Pawn")]
    Pawn,
}

impl PieceKind {
    pub fn name(self) -> &'static str {
        match self {
            PieceKind::King => "King",
            PieceKind::Queen => "Queen",
            PieceKind::Rook => "Rook",
            PieceKind::Bishop => "Bishop",
            PieceKind::Knight => "Knight",
            PieceKind::Pawn => "Pawn",
        }
    }

    /// Unit directions along which this piece slides. Empty for non-sliding pieces.
    pub fn slide_dirs(self) -> &'static [(i32, i32)] {
        match self {
            PieceKind::Queen => &QUEEN_DIRS,
            PieceKind::Rook => &ROOK_DIRS,
            PieceKind::Bishop => &BISHOP_DIRS,
            PieceKind::King | PieceKind::Knight | PieceKind::Pawn => &[],
        }
    }

    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn is_promotion_target(self) -> bool {
        PROMOTION_KINDS.contains(&self)
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.to_char())
    }
}

impl TryFrom<char> for PieceKind {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let res = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        Ok(res)
    }
}

/// Pieces a pawn may promote to, in the order the move generator emits them.
pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

pub const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub const QUEEN_DIRS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

pub const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// A piece standing on a square. Positions are flat collections of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(alias = "type")]
    pub kind: PieceKind,
    #[serde(alias = "color")]
    pub side: Color,
    pub x: u8,
    pub y: u8,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Color, square: Square) -> Piece {
        Piece {
            kind,
            side,
            x: square.x,
            y: square.y,
        }
    }

    pub fn square(&self) -> Square {
        Square::new(self.x, self.y)
    }

    pub fn is_at(&self, square: Square) -> bool {
        self.x == square.x && self.y == square.y
    }

    /// The diagram symbol for this piece: uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        let chr = self.kind.to_char();
        match self.side {
            Color::White => chr.to_ascii_uppercase(),
            Color::Black => chr,
        }
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} on {}", self.side.name(), self.kind.name(), self.square())
    }
}
