use log::{debug, info, trace};

use crate::attacks::is_in_check;
use crate::board::Board;
use crate::castling::{can_castle, CastlingRights};
use crate::error::MoveError;
use crate::movegen::{en_passant_victim, generate};
use crate::types::*;

/// Remaining pieces per color and kind. Only the insufficient material rule
/// reads these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceCounts {
    counts: [[u8; 6]; 2],
}

impl PieceCounts {
    pub fn from_board(board: &Board) -> PieceCounts {
        let mut counts = PieceCounts::default();
        for (_, piece) in board.pieces() {
            counts.increment(piece);
        }
        counts
    }

    pub fn get(&self, color: Color, piece_type: PieceType) -> u8 {
        self.counts[color.index()][piece_type.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().map(|&c| c as u32).sum()
    }

    pub(crate) fn increment(&mut self, piece: Piece) {
        let slot = &mut self.counts[piece.color.index()][piece.piece_type.index()];
        *slot = slot.saturating_add(1);
    }

    pub(crate) fn decrement(&mut self, piece: Piece) {
        let slot = &mut self.counts[piece.color.index()][piece.piece_type.index()];
        *slot = slot.saturating_sub(1);
    }

    /// Bare kings, or kings plus a single knight or bishop. Two minor pieces
    /// or more always count as enough.
    pub fn is_insufficient_material(&self) -> bool {
        match self.total() {
            0..=2 => true,
            3 => [Color::White, Color::Black].into_iter().all(|color| {
                [PieceType::Pawn, PieceType::Queen, PieceType::Rook]
                    .into_iter()
                    .all(|pt| self.get(color, pt) == 0)
            }),
            _ => false,
        }
    }
}

/// A game in progress.
///
/// Only [`GameState::try_move`] and [`GameState::try_resolve_promotion`] (and
/// their `bool` wrappers) change it. The terminal flags always describe the
/// side to move and are recomputed after every turn switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) last_pawn_double_step: Option<DoubleStep>,
    pub(crate) pending_promotion: Option<Square>,
    pub(crate) piece_counts: PieceCounts,
    pub(crate) in_check: bool,
    pub(crate) has_legal_moves: bool,
    pub(crate) checkmate: bool,
    pub(crate) stalemate: bool,
    pub(crate) insufficient_material: bool,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Standard initial position, white to move, every castling right held
    pub fn new() -> GameState {
        let board = Board::new();
        let mut state = GameState {
            board,
            side_to_move: Color::White,
            castling_rights: CastlingRights::all(),
            last_pawn_double_step: None,
            pending_promotion: None,
            piece_counts: PieceCounts::from_board(&board),
            in_check: false,
            has_legal_moves: true,
            checkmate: false,
            stalemate: false,
            insufficient_material: false,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        state.classify();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn last_pawn_double_step(&self) -> Option<DoubleStep> {
        self.last_pawn_double_step
    }

    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    pub fn piece_counts(&self) -> &PieceCounts {
        &self.piece_counts
    }

    pub fn in_check(&self) -> bool {
        self.in_check
    }

    pub fn has_legal_moves(&self) -> bool {
        self.has_legal_moves
    }

    pub fn checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn stalemate(&self) -> bool {
        self.stalemate
    }

    pub fn insufficient_material(&self) -> bool {
        self.insufficient_material
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    pub fn is_terminal(&self) -> bool {
        self.checkmate || self.stalemate || self.insufficient_material
    }

    pub fn status(&self) -> Status {
        if self.checkmate {
            Status::Checkmate(self.side_to_move.other_color())
        } else if self.stalemate {
            Status::Stalemate
        } else if self.insufficient_material {
            Status::InsufficientMaterial
        } else if self.pending_promotion.is_some() {
            Status::AwaitingPromotion
        } else if self.in_check {
            Status::Check
        } else {
            Status::Ongoing
        }
    }

    /// Can the side to move castle on `side` this turn
    pub fn can_castle(&self, side: CastlingSide) -> bool {
        can_castle(self, self.side_to_move, side)
    }

    /// Where the piece on `sq` may legally go.
    ///
    /// Empty when the square is empty or holds an opponent's piece, while a
    /// promotion is pending, and once the game is over.
    pub fn legal_destinations(&self, sq: Square) -> Vec<Square> {
        if self.pending_promotion.is_some() || self.is_terminal() {
            return vec![];
        }
        match self.board.piece_at(sq) {
            Some(piece) if piece.color == self.side_to_move => generate(self, sq, true),
            _ => vec![],
        }
    }

    /// Every legal (from, to) pair for the side to move. Unlike
    /// [`GameState::legal_destinations`] this ignores the draw flags, which is
    /// what move counting wants.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        if self.pending_promotion.is_some() {
            return vec![];
        }
        self.board
            .pieces_of(self.side_to_move)
            .flat_map(|(from, _)| generate(self, from, true).into_iter().map(move |to| (from, to)))
            .collect()
    }

    /// Make the move if it is legal. Returns false and leaves the game
    /// untouched otherwise.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> bool {
        self.try_move(from, to).is_ok()
    }

    pub fn try_move(&mut self, from: Square, to: Square) -> Result<MoveReport, MoveError> {
        if let Err(e) = self.check_move(from, to) {
            trace!("declined {from}{to}: {e}");
            return Err(e);
        }
        self.apply_move(from, to).ok_or(MoveError::NoPiece(from))
    }

    fn check_move(&self, from: Square, to: Square) -> Result<(), MoveError> {
        if let Some(sq) = self.pending_promotion {
            return Err(MoveError::PromotionPending(sq));
        }
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let piece = self.board.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        if piece.color != self.side_to_move {
            return Err(MoveError::NotYourPiece {
                square: from,
                owner: piece.color,
                to_move: self.side_to_move,
            });
        }
        if !generate(self, from, true).contains(&to) {
            return Err(MoveError::IllegalDestination { from, to });
        }
        Ok(())
    }

    /// Apply a move already known to be legal. Returns `None` only when
    /// `from` is empty.
    pub(crate) fn apply_move(&mut self, from: Square, to: Square) -> Option<MoveReport> {
        let piece = self.board.piece_at(from)?;
        let mut move_flag = MoveFlag::Regular;
        let mut captured = None;

        // the captured pawn is not on the destination square
        if let Some(victim_sq) = en_passant_victim(&self.board, from, to, self.last_pawn_double_step) {
            if let Some(victim) = self.board.take(victim_sq) {
                self.piece_counts.decrement(victim);
                captured = Some(victim);
            }
            move_flag = MoveFlag::EnPassantCapture;
        }

        self.castling_rights.revoke_for_square(from);

        if piece.piece_type == PieceType::King && from.col().abs_diff(to.col()) == 2 {
            let side = if to.col() > from.col() {
                CastlingSide::Kingside
            } else {
                CastlingSide::Queenside
            };
            let (rook_from_col, rook_to_col) = side.rook_cols();
            let rook_from = Square::at(from.row(), rook_from_col);
            let rook = self.board.take(rook_from);
            self.board.set(Square::at(from.row(), rook_to_col), rook);
            move_flag = match side {
                CastlingSide::Kingside => MoveFlag::CastleKingside,
                CastlingSide::Queenside => MoveFlag::CastleQueenside,
            };
        } else if let Some(target) = self.board.piece_at(to) {
            if target.color != piece.color {
                self.piece_counts.decrement(target);
                self.castling_rights.revoke_for_square(to);
                captured = Some(target);
            }
        }

        self.board.set(from, None);
        self.board.set(to, Some(piece));

        self.last_pawn_double_step = None;
        if piece.piece_type == PieceType::Pawn && from.row().abs_diff(to.row()) == 2 {
            self.last_pawn_double_step = Some(DoubleStep { from, to });
            move_flag = MoveFlag::DoublePawnPush;
        }

        if piece.piece_type == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        let mut report = MoveReport {
            piece,
            from,
            to,
            captured,
            move_flag,
            promotion_pending: false,
            gives_check: false,
        };

        if piece.piece_type == PieceType::Pawn && to.row() == piece.color.promotion_row() {
            self.pending_promotion = Some(to);
            self.in_check = false;
            report.promotion_pending = true;
            debug!("{} ({from}{to}), awaiting promotion", report.to_human());
            return Some(report);
        }

        self.end_turn();
        report.gives_check = self.in_check;
        debug!("{} ({from}{to})", report.to_human());
        Some(report)
    }

    /// Turn the pending pawn into `piece_type`. Returns false and changes
    /// nothing if no promotion is pending or the choice is not one of
    /// [`PIECES_CAN_PROMOTE_TO`].
    pub fn resolve_promotion(&mut self, piece_type: PieceType) -> bool {
        self.try_resolve_promotion(piece_type).is_ok()
    }

    pub fn try_resolve_promotion(&mut self, piece_type: PieceType) -> Result<Status, MoveError> {
        let Some(sq) = self.pending_promotion else {
            trace!("declined promotion to {piece_type:?}: nothing pending");
            return Err(MoveError::NoPromotionPending);
        };
        if !PIECES_CAN_PROMOTE_TO.contains(&piece_type) {
            trace!("declined promotion to {piece_type:?}");
            return Err(MoveError::InvalidPromotionPiece(piece_type));
        }
        let Some(pawn) = self.board.piece_at(sq) else {
            return Err(MoveError::NoPiece(sq));
        };

        let promoted = Piece::new(pawn.color, piece_type);
        self.board.set(sq, Some(promoted));
        self.piece_counts.decrement(pawn);
        self.piece_counts.increment(promoted);
        self.pending_promotion = None;
        debug!("pawn on {sq} promoted to {}", promoted.to_human());

        self.end_turn();
        Ok(self.status())
    }

    fn end_turn(&mut self) {
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other_color();
        self.classify();
        if self.is_terminal() {
            info!("game over: {:?}", self.status());
        }
    }

    /// Recompute check, mate, stalemate and material flags for the side to move
    pub(crate) fn classify(&mut self) {
        let color = self.side_to_move;
        self.in_check = is_in_check(&self.board, color);
        self.has_legal_moves = self
            .board
            .pieces_of(color)
            .any(|(from, _)| !generate(self, from, true).is_empty());
        self.checkmate = !self.has_legal_moves && self.in_check;
        self.stalemate = !self.has_legal_moves && !self.in_check;
        self.insufficient_material = self.piece_counts.is_insufficient_material();
    }
}
