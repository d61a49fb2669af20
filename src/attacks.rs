//! Attack detection.
//!
//! A square is attacked by a side when some piece of that side has it among
//! its pseudo-legal destinations. Generation here never asks whether a move
//! is legal, which is what keeps legality checking from recursing forever.
//!
//! Pawn pushes only reach empty squares and diagonal pawn moves only reach
//! occupied ones, so the answer is only meaningful for an occupied square.
//! Every caller asks about a square with a king standing on it.

use crate::board::Board;
use crate::movegen::MoveGenerator;
use crate::types::{Color, Square};

pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    // en passant lands on an empty square, so it can never hit the queried square
    let generator = MoveGenerator::new(board, None);
    board
        .pieces_of(by)
        .any(|(from, _)| generator.pseudo_destinations(from).contains(&square))
}

/// Is the king of `color` attacked on `board`. A board without that king is
/// never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .find_king(color)
        .is_some_and(|king| is_attacked(board, king, color.other_color()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceType};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement).unwrap()
    }

    #[test]
    fn start_position_has_no_checks() {
        let b = Board::new();
        assert!(!is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
    }

    #[test]
    fn rook_attacks_until_blocked() {
        // white king e1, black rook e8, nothing between
        let b = board("4r3/8/8/8/8/8/8/4K3");
        assert!(is_attacked(&b, sq("e1"), Color::Black));
        assert!(is_in_check(&b, Color::White));

        // a white pawn on e4 blocks the file
        let blocked = board("4r3/8/8/8/4P3/8/8/4K3");
        assert!(!is_in_check(&blocked, Color::White));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let b = board("8/8/8/8/8/3n4/PPPPPPPP/4K3");
        assert!(is_in_check(&b, Color::White));
    }

    #[test]
    fn pawn_attacks_diagonally_only() {
        // black pawn on d2 attacks e1, a black pawn straight ahead does not
        let diagonal = board("4k3/8/8/8/8/8/3p4/4K3");
        assert!(is_in_check(&diagonal, Color::White));

        let ahead = board("4k3/8/8/8/8/4K3/4p3/8");
        assert!(!is_in_check(&ahead, Color::White));
    }

    #[test]
    fn occupied_square_attack_by_either_side() {
        let mut b = Board::new();
        b.set(sq("e4"), Some(Piece::new(Color::White, PieceType::Knight)));
        // nothing on the board reaches e4 yet
        assert!(!is_attacked(&b, sq("e4"), Color::Black));
        b.set(sq("d5"), Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert!(is_attacked(&b, sq("e4"), Color::Black));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let b = board("8/8/8/8/8/8/8/r7");
        assert!(!is_in_check(&b, Color::White));
    }
}
