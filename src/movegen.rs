use crate::attacks::is_in_check;
use crate::board::Board;
use crate::castling::can_castle;
use crate::game::GameState;
use crate::tables::{ATTACK_TABLES, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::types::*;

/// Most destinations a single piece can have (a queen in the middle of an empty board)
const MAX_DESTINATIONS: usize = 27;

/// Pseudo-legal destinations for one board: the piece movement rules, with
/// no regard for the mover's own king.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    double_step: Option<DoubleStep>,
}

impl<'a> MoveGenerator<'a> {
    /// `double_step` is the pawn advance that may be captured en passant, if any
    pub fn new(board: &'a Board, double_step: Option<DoubleStep>) -> Self {
        Self { board, double_step }
    }

    /// Empty if `from` holds no piece
    pub fn pseudo_destinations(&self, from: Square) -> Vec<Square> {
        let Some(piece) = self.board.piece_at(from) else {
            return vec![];
        };

        let mut moves = Vec::with_capacity(MAX_DESTINATIONS);
        match piece.piece_type {
            PieceType::Pawn => self.generate_pawn_moves(from, piece.color, &mut moves),
            PieceType::Rook => self.generate_slider_moves(from, piece.color, ROOK_DIRECTIONS, &mut moves),
            PieceType::Bishop => {
                self.generate_slider_moves(from, piece.color, BISHOP_DIRECTIONS, &mut moves)
            }
            PieceType::Queen => {
                self.generate_slider_moves(from, piece.color, QUEEN_DIRECTIONS, &mut moves)
            }
            PieceType::Knight => self.generate_jump_moves(
                piece.color,
                ATTACK_TABLES.knight_targets(from),
                &mut moves,
            ),
            // castling is added by `generate`, never here
            PieceType::King => {
                self.generate_jump_moves(piece.color, ATTACK_TABLES.king_targets(from), &mut moves)
            }
        }
        moves
    }

    fn generate_pawn_moves(&self, from: Square, color: Color, moves: &mut Vec<Square>) {
        let direction = color.pawn_direction();

        // pushes
        if let Some(one_step) = from.offset(direction, 0) {
            if self.board.is_empty(one_step) {
                moves.push(one_step);
                if from.row() == color.pawn_start_row() {
                    if let Some(two_step) = from.offset(2 * direction, 0) {
                        if self.board.is_empty(two_step) {
                            moves.push(two_step);
                        }
                    }
                }
            }
        }

        // captures
        for col_offset in [-1, 1] {
            if let Some(target) = from.offset(direction, col_offset) {
                if self
                    .board
                    .piece_at(target)
                    .is_some_and(|p| p.color != color)
                {
                    moves.push(target);
                }
            }
        }

        if let Some(target) = self.en_passant_destination(from, color) {
            moves.push(target);
        }
    }

    /// Landing square of an en passant capture by the pawn on `from`.
    ///
    /// Two pawns leave their squares in one ply here, so the capture is only
    /// offered if it does not expose the capturing side's king, whatever the
    /// caller asked for.
    fn en_passant_destination(&self, from: Square, color: Color) -> Option<Square> {
        let step = self.double_step?;
        if step.to.row() != from.row() || step.to.col().abs_diff(from.col()) != 1 {
            return None;
        }
        if self.board.piece_at(step.to) != Some(Piece::new(color.other_color(), PieceType::Pawn)) {
            return None;
        }

        let landing = step.skipped_square();
        if !self.board.is_empty(landing) {
            return None;
        }

        let after = self.board.with_relocation(from, landing, Some(step.to));
        if is_in_check(&after, color) {
            return None;
        }
        Some(landing)
    }

    fn generate_slider_moves(
        &self,
        from: Square,
        color: Color,
        directions: std::ops::Range<usize>,
        moves: &mut Vec<Square>,
    ) {
        for direction in directions {
            for &target in ATTACK_TABLES.ray(from, direction) {
                match self.board.piece_at(target) {
                    None => moves.push(target),
                    Some(other) => {
                        if other.color != color {
                            moves.push(target);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn generate_jump_moves(&self, color: Color, targets: &[Square], moves: &mut Vec<Square>) {
        moves.extend(
            targets
                .iter()
                .filter(|&&target| self.board.piece_at(target).map_or(true, |p| p.color != color)),
        );
    }
}

/// If moving the piece on `from` to `to` is an en passant capture, the square
/// of the pawn it captures
pub fn en_passant_victim(
    board: &Board,
    from: Square,
    to: Square,
    double_step: Option<DoubleStep>,
) -> Option<Square> {
    let step = double_step?;
    let mover = board.piece_at(from)?;
    if mover.piece_type != PieceType::Pawn || from.col() == to.col() || !board.is_empty(to) {
        return None;
    }
    if step.to.row() != from.row() || step.to.col() != to.col() {
        return None;
    }
    match board.piece_at(step.to) {
        Some(victim) if victim.piece_type == PieceType::Pawn && victim.color != mover.color => {
            Some(step.to)
        }
        _ => None,
    }
}

/// Destinations of the piece on `from`.
///
/// With `filter_for_check`, castling is added for a king and every candidate
/// that would leave the mover's king attacked is dropped. Without it the
/// result is the raw piece movement.
pub fn generate(state: &GameState, from: Square, filter_for_check: bool) -> Vec<Square> {
    let board = state.board();
    let Some(piece) = board.piece_at(from) else {
        return vec![];
    };

    let double_step = state.last_pawn_double_step();
    let mut moves = MoveGenerator::new(board, double_step).pseudo_destinations(from);
    if !filter_for_check {
        return moves;
    }

    if piece.piece_type == PieceType::King {
        for side in CastlingSide::BOTH {
            if can_castle(state, piece.color, side) {
                if let Some(target) = Square::new(from.row(), side.king_destination_col()) {
                    moves.push(target);
                }
            }
        }
    }

    moves.retain(|&to| {
        let captured = en_passant_victim(board, from, to, double_step);
        let after = board.with_relocation(from, to, captured);
        !is_in_check(&after, piece.color)
    });
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn squares(list: &[&str]) -> Vec<Square> {
        let mut v: Vec<Square> = list.iter().map(|s| sq(s)).collect();
        v.sort();
        v
    }

    fn sorted(mut v: Vec<Square>) -> Vec<Square> {
        v.sort();
        v
    }

    fn pseudo(placement: &str, from: &str) -> Vec<Square> {
        let board = Board::from_placement(placement).unwrap();
        sorted(MoveGenerator::new(&board, None).pseudo_destinations(sq(from)))
    }

    fn legal(fen: &str, from: &str) -> Vec<Square> {
        let state = GameState::from_fen(fen).unwrap();
        sorted(generate(&state, sq(from), true))
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(pseudo("8/8/8/8/8/8/8/8", "e4").is_empty());
    }

    #[test]
    fn pawn_pushes_from_start() {
        assert_eq!(pseudo("8/8/8/8/8/8/4P3/8", "e2"), squares(&["e3", "e4"]));
        assert_eq!(pseudo("8/4p3/8/8/8/8/8/8", "e7"), squares(&["e6", "e5"]));
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        assert_eq!(pseudo("8/8/8/8/4n3/8/4P3/8", "e2"), squares(&["e3"]));
        assert!(pseudo("8/8/8/8/8/4n3/4P3/8", "e2").is_empty());
        // no double push off the start row
        assert_eq!(pseudo("8/8/8/8/8/4P3/8/8", "e3"), squares(&["e4"]));
    }

    #[test]
    fn pawn_captures_enemies_only() {
        assert_eq!(
            pseudo("8/8/8/8/8/3n1N2/4P3/8", "e2"),
            squares(&["d3", "e3", "e4"])
        );
    }

    #[test]
    fn rook_slides_until_blocked() {
        // white rook a1, own pawn a4, black knight d1
        assert_eq!(
            pseudo("8/8/8/8/P7/8/8/R2n4", "a1"),
            squares(&["a2", "a3", "b1", "c1", "d1"])
        );
    }

    #[test]
    fn bishop_and_queen_on_empty_board() {
        assert_eq!(pseudo("8/8/8/8/3B4/8/8/8", "d4").len(), 13);
        assert_eq!(pseudo("8/8/8/8/3Q4/8/8/8", "d4").len(), 27);
    }

    #[test]
    fn knight_skips_own_pieces() {
        assert_eq!(pseudo("8/8/8/8/8/8/8/1N6", "b1"), squares(&["a3", "c3", "d2"]));
        assert_eq!(pseudo("8/8/8/8/8/2P5/8/1N6", "b1"), squares(&["a3", "d2"]));
    }

    #[test]
    fn king_steps_without_castling_when_unfiltered() {
        let state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let unfiltered = sorted(generate(&state, sq("e1"), false));
        assert_eq!(unfiltered, squares(&["d1", "d2", "e2", "f1", "f2"]));
        let filtered = sorted(generate(&state, sq("e1"), true));
        assert_eq!(
            filtered,
            squares(&["c1", "d1", "d2", "e2", "f1", "f2", "g1"])
        );
    }

    #[test]
    fn pinned_piece_stays_on_the_pin_line() {
        // white rook d4 pinned against the king on d2 by a rook on d7
        assert_eq!(
            legal("7k/3r4/8/8/3R4/8/3K4/8 w - - 0 1", "d4"),
            squares(&["d3", "d5", "d6", "d7"])
        );
    }

    #[test]
    fn king_cannot_step_into_attack() {
        // black rook on f8 covers the f-file
        assert_eq!(
            legal("5r1k/8/8/8/8/8/8/4K3 w - - 0 1", "e1"),
            squares(&["d1", "d2", "e2"])
        );
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        // black pawn e2 covers d1 and f1 and is defended by the rook on e8
        assert_eq!(
            legal("4r2k/8/8/8/8/8/4p3/4K3 w - - 0 1", "e1"),
            squares(&["d2", "f2"])
        );
    }

    #[test]
    fn must_answer_check() {
        // black rook on e8 checks, the knight can only block on e5
        assert_eq!(
            legal("4r2k/8/8/8/8/5N2/8/4K3 w - - 0 1", "f3"),
            squares(&["e5"])
        );
    }

    #[test]
    fn en_passant_offered_right_after_double_step() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(legal(fen, "e5"), squares(&["d6", "e6"]));
        assert_eq!(
            en_passant_victim(state.board(), sq("e5"), sq("d6"), state.last_pawn_double_step()),
            Some(sq("d5"))
        );
        assert_eq!(
            en_passant_victim(state.board(), sq("e5"), sq("e6"), state.last_pawn_double_step()),
            None
        );
    }

    #[test]
    fn en_passant_not_offered_without_double_step() {
        assert_eq!(legal("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2", "e5"), squares(&["e6"]));
    }

    #[test]
    fn en_passant_refused_when_it_exposes_the_king() {
        // both pawns sit between the white king on a5 and the black rook on h5
        let fen = "4k3/8/8/K2pP2r/8/8/8/8 w - d6 0 2";
        let state = GameState::from_fen(fen).unwrap();
        // pre-validated even in the unfiltered generator
        assert_eq!(sorted(generate(&state, sq("e5"), false)), squares(&["e6"]));
        assert_eq!(legal(fen, "e5"), squares(&["e6"]));
    }

    #[test]
    fn en_passant_can_remove_a_checking_pawn() {
        // black pawn just arrived on d5 giving check to the king on e4,
        // pushing to e6 would leave the check in place
        assert_eq!(
            legal("4k3/8/8/3pP3/4K3/8/8/8 w - d6 0 2", "e5"),
            squares(&["d6"])
        );
    }
}
