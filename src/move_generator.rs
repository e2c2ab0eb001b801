// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pseudo-legal move generation. Moves produced here obey the movement and blocking rules of
//! each piece but may leave the mover's own king in check; `Position::legal_moves` filters
//! them down.
use crate::moves::Move;
use crate::position::piece_at;
use crate::types::{BoardSize, Color, Piece, PieceKind, Square};
use crate::types::{KING_OFFSETS, KNIGHT_OFFSETS, PROMOTION_KINDS};

pub type MoveVec = Vec<Move>;

/// Generates every pseudo-legal move for `side`.
pub fn generate_pseudo_legal_moves(pieces: &[Piece], size: BoardSize, side: Color) -> MoveVec {
    let mut moves = MoveVec::new();
    for piece in pieces.iter().filter(|p| p.side == side) {
        generate_piece_moves(pieces, size, piece, &mut moves);
    }

    moves
}

/// Generates the pseudo-legal moves of a single piece, appending them to `moves`.
pub fn generate_piece_moves(pieces: &[Piece], size: BoardSize, piece: &Piece, moves: &mut MoveVec) {
    match piece.kind {
        PieceKind::King => generate_step_moves(pieces, size, piece, &KING_OFFSETS, moves),
        PieceKind::Knight => generate_step_moves(pieces, size, piece, &KNIGHT_OFFSETS, moves),
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            generate_slide_moves(pieces, size, piece, moves)
        }
        PieceKind::Pawn => generate_pawn_moves(pieces, size, piece, moves),
    }
}

/// Kings and knights jump to fixed offsets; the destination must be empty or hold an enemy.
fn generate_step_moves(
    pieces: &[Piece],
    size: BoardSize,
    piece: &Piece,
    offsets: &[(i32, i32)],
    moves: &mut MoveVec,
) {
    let from = piece.square();
    for &(dx, dy) in offsets {
        let to = match from.offset(dx, dy, size) {
            Some(sq) => sq,
            None => continue,
        };

        match piece_at(pieces, to) {
            Some(target) if target.side == piece.side => {}
            _ => moves.push(Move::quiet(from, to)),
        }
    }
}

fn generate_slide_moves(pieces: &[Piece], size: BoardSize, piece: &Piece, moves: &mut MoveVec) {
    let from = piece.square();
    for &(dx, dy) in piece.kind.slide_dirs() {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dx, dy, size) {
            if let Some(target) = piece_at(pieces, to) {
                // Captures end the ray; friendly pieces end it without being added.
                if target.side != piece.side {
                    moves.push(Move::quiet(from, to));
                }

                break;
            }

            moves.push(Move::quiet(from, to));
            cursor = to;
        }
    }
}

fn generate_pawn_moves(pieces: &[Piece], size: BoardSize, piece: &Piece, moves: &mut MoveVec) {
    let from = piece.square();
    let forward = piece.side.forward();

    if let Some(single) = from.offset(0, forward, size) {
        if piece_at(pieces, single).is_none() {
            push_pawn_move(size, piece.side, from, single, moves);

            if from.y == piece.side.pawn_start_rank(size) {
                if let Some(double) = single.offset(0, forward, size) {
                    if piece_at(pieces, double).is_none() {
                        push_pawn_move(size, piece.side, from, double, moves);
                    }
                }
            }
        }
    }

    for &dx in &[-1, 1] {
        let to = match from.offset(dx, forward, size) {
            Some(sq) => sq,
            None => continue,
        };

        match piece_at(pieces, to) {
            Some(target) if target.side != piece.side => {
                push_pawn_move(size, piece.side, from, to, moves)
            }
            _ => {}
        }
    }
}

/// Pushes a pawn move, expanding it into one move per promotion choice on the last rank.
fn push_pawn_move(size: BoardSize, side: Color, from: Square, to: Square, moves: &mut MoveVec) {
    if to.y == side.last_rank(size) {
        for &kind in &PROMOTION_KINDS {
            moves.push(Move::promotion(from, to, kind));
        }
    } else {
        moves.push(Move::quiet(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pseudo_legal_moves;
    use crate::moves::Move;
    use crate::types::{BoardSize, Color, Piece, PieceKind, Square};

    fn piece(kind: PieceKind, side: Color, x: u8, y: u8) -> Piece {
        Piece::new(kind, side, Square::new(x, y))
    }

    fn size(n: u8) -> BoardSize {
        BoardSize::new(n).unwrap()
    }

    #[test]
    fn rook_corner_empty_board() {
        let pieces = [piece(PieceKind::Rook, Color::White, 0, 0)];
        let moves = generate_pseudo_legal_moves(&pieces, size(8), Color::White);
        assert_eq!(14, moves.len());
    }

    #[test]
    fn only_moves_for_requested_side() {
        let pieces = [
            piece(PieceKind::Rook, Color::White, 0, 0),
            piece(PieceKind::Knight, Color::Black, 4, 4),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(5), Color::Black);
        assert!(moves.iter().all(|m| m.from == Square::new(4, 4)));
    }

    #[test]
    fn slider_stops_at_friendly_piece() {
        let pieces = [
            piece(PieceKind::Rook, Color::White, 0, 0),
            piece(PieceKind::Pawn, Color::White, 0, 2),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(4), Color::White);
        let rook_moves: Vec<_> = moves
            .iter()
            .filter(|m| m.from == Square::new(0, 0))
            .collect();

        // a2 up the file, b1 c1 d1 along the rank
        assert_eq!(4, rook_moves.len());
        assert!(!rook_moves.iter().any(|m| m.to == Square::new(0, 2)));
        assert!(!rook_moves.iter().any(|m| m.to == Square::new(0, 3)));
    }

    #[test]
    fn slider_captures_and_stops() {
        let pieces = [
            piece(PieceKind::Bishop, Color::Black, 0, 0),
            piece(PieceKind::Knight, Color::White, 2, 2),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::Black);
        assert_eq!(2, moves.len());
        assert!(moves.contains(&Move::quiet(Square::new(0, 0), Square::new(2, 2))));
        assert!(!moves.iter().any(|m| m.to == Square::new(3, 3)));
    }

    #[test]
    fn knight_in_corner() {
        let pieces = [piece(PieceKind::Knight, Color::White, 0, 0)];
        let moves = generate_pseudo_legal_moves(&pieces, size(5), Color::White);
        assert_eq!(2, moves.len());
    }

    #[test]
    fn knight_skips_friendly_square() {
        let pieces = [
            piece(PieceKind::Knight, Color::White, 0, 0),
            piece(PieceKind::King, Color::White, 1, 2),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(5), Color::White);
        let knight: Vec<_> = moves
            .iter()
            .filter(|m| m.from == Square::new(0, 0))
            .collect();
        assert_eq!(vec![&Move::quiet(Square::new(0, 0), Square::new(2, 1))], knight);
    }

    #[test]
    fn white_pawn_double_push() {
        let pieces = [piece(PieceKind::Pawn, Color::White, 2, 1)];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::White);
        assert_eq!(2, moves.len());
        assert!(moves.contains(&Move::quiet(Square::new(2, 1), Square::new(2, 2))));
        assert!(moves.contains(&Move::quiet(Square::new(2, 1), Square::new(2, 3))));
    }

    #[test]
    fn black_pawn_double_push_uses_size() {
        let pieces = [piece(PieceKind::Pawn, Color::Black, 1, 4)];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::Black);
        assert_eq!(2, moves.len());
        assert!(moves.contains(&Move::quiet(Square::new(1, 4), Square::new(1, 3))));
        assert!(moves.contains(&Move::quiet(Square::new(1, 4), Square::new(1, 2))));
    }

    #[test]
    fn pawn_double_push_blocked_by_intervening_piece() {
        let pieces = [
            piece(PieceKind::Pawn, Color::White, 2, 1),
            piece(PieceKind::Knight, Color::Black, 2, 2),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::White);
        assert!(moves.is_empty());
    }

    #[test]
    fn pawn_double_push_blocked_on_landing_square() {
        let pieces = [
            piece(PieceKind::Pawn, Color::White, 2, 1),
            piece(PieceKind::Knight, Color::Black, 2, 3),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::White);
        assert_eq!(vec![Move::quiet(Square::new(2, 1), Square::new(2, 2))], moves);
    }

    #[test]
    fn pawn_captures_only_enemies() {
        let pieces = [
            piece(PieceKind::Pawn, Color::White, 2, 2),
            piece(PieceKind::Rook, Color::Black, 1, 3),
            piece(PieceKind::Rook, Color::White, 3, 3),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(6), Color::White);
        let pawn: Vec<_> = moves
            .iter()
            .filter(|m| m.from == Square::new(2, 2))
            .cloned()
            .collect();
        assert_eq!(2, pawn.len());
        assert!(pawn.contains(&Move::quiet(Square::new(2, 2), Square::new(2, 3))));
        assert!(pawn.contains(&Move::quiet(Square::new(2, 2), Square::new(1, 3))));
    }

    #[test]
    fn promotion_emits_four_moves() {
        let pieces = [piece(PieceKind::Pawn, Color::White, 0, 3)];
        let moves = generate_pseudo_legal_moves(&pieces, size(5), Color::White);
        assert_eq!(4, moves.len());
        assert!(moves.iter().all(|m| m.to == Square::new(0, 4) && m.is_promotion()));
        for &kind in &[
            PieceKind::Queen,
            PieceKind::Rook,
            PieceKind::Bishop,
            PieceKind::Knight,
        ] {
            assert!(moves.contains(&Move::promotion(
                Square::new(0, 3),
                Square::new(0, 4),
                kind
            )));
        }
    }

    #[test]
    fn black_capture_promotion() {
        let pieces = [
            piece(PieceKind::Pawn, Color::Black, 1, 1),
            piece(PieceKind::Rook, Color::White, 1, 0),
            piece(PieceKind::Rook, Color::White, 2, 0),
        ];
        let moves = generate_pseudo_legal_moves(&pieces, size(4), Color::Black);

        // straight ahead is blocked, so only the capture on c1 remains
        assert_eq!(4, moves.len());
        assert!(moves.iter().all(|m| m.to == Square::new(2, 0)));
    }
}
