//! Saving and restoring a [`GameState`] as a six field FEN string.
//!
//! Two details go beyond plain FEN. The en passant field is written whenever
//! the last move was a double pawn step, capturable or not, so a restored game
//! replays exactly like the original. A pawn standing on its farthest row can
//! only be a promotion that has not been resolved yet, so restoring one marks
//! it pending, with the promoting side still to move.

use crate::attacks::is_in_check;
use crate::board::Board;
use crate::castling::CastlingRights;
use crate::error::FenError;
use crate::game::{GameState, PieceCounts};
use crate::types::*;

impl GameState {
    pub fn from_fen(fen: &str) -> Result<GameState, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let [placement, side, castling, en_passant, halfmove, fullmove] = fields[..] else {
            return Err(FenError::FieldCount(fields.len()));
        };

        let board = Board::from_placement(placement)?;
        for color in [Color::White, Color::Black] {
            let count = board
                .pieces_of(color)
                .filter(|(_, p)| p.piece_type == PieceType::King)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }

        let side_to_move = parse_side(side)?;
        let castling_rights = CastlingRights::from_fen(castling)?;
        let pending_promotion = find_pending_promotion(&board, side_to_move)?;

        // the side that just moved cannot have left its king attacked
        let just_moved = match pending_promotion {
            Some(_) => side_to_move,
            None => side_to_move.other_color(),
        };
        if is_in_check(&board, just_moved) {
            return Err(FenError::KingCapturable(just_moved));
        }

        let last_pawn_double_step = match en_passant {
            "-" => None,
            _ if pending_promotion.is_some() => {
                return Err(FenError::EnPassant(en_passant.to_string()))
            }
            _ => Some(parse_double_step(&board, en_passant, side_to_move.other_color())?),
        };

        let halfmove_clock = halfmove
            .parse::<u32>()
            .map_err(|_| FenError::Clock(halfmove.to_string()))?;
        let fullmove_number = match fullmove.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(FenError::Clock(fullmove.to_string())),
        };

        let mut state = GameState {
            board,
            side_to_move,
            castling_rights,
            last_pawn_double_step,
            pending_promotion,
            piece_counts: PieceCounts::from_board(&board),
            in_check: false,
            has_legal_moves: true,
            checkmate: false,
            stalemate: false,
            insufficient_material: false,
            halfmove_clock,
            fullmove_number,
        };
        if state.pending_promotion.is_none() {
            state.classify();
        }
        Ok(state)
    }

    pub fn to_fen(&self) -> String {
        let en_passant = match self.last_pawn_double_step {
            Some(step) => step.skipped_square().to_algebraic(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {} {} {}",
            self.board.to_placement(),
            self.side_to_move.to_char(),
            self.castling_rights.to_fen(),
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_side(side: &str) -> Result<Color, FenError> {
    let mut chars = side.chars();
    match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(FenError::SideToMove(side.to_string())),
    }
}

/// The en passant target is the square `mover`'s pawn skipped; the pawn itself
/// must be standing one row further on.
fn parse_double_step(board: &Board, field: &str, mover: Color) -> Result<DoubleStep, FenError> {
    let err = || FenError::EnPassant(field.to_string());
    let skipped = Square::from_algebraic(field).ok_or_else(err)?;
    let dir = mover.pawn_direction();
    let from = skipped.offset(-dir, 0).ok_or_else(err)?;
    let to = skipped.offset(dir, 0).ok_or_else(err)?;
    if from.row() != mover.pawn_start_row()
        || board.piece_at(to) != Some(Piece::new(mover, PieceType::Pawn))
        || !board.is_empty(skipped)
        || !board.is_empty(from)
    {
        return Err(err());
    }
    Ok(DoubleStep { from, to })
}

fn find_pending_promotion(board: &Board, side_to_move: Color) -> Result<Option<Square>, FenError> {
    let mut pending = None;
    for (sq, piece) in board.pieces() {
        if piece.piece_type != PieceType::Pawn {
            continue;
        }
        if sq.row() == piece.color.back_row() {
            return Err(FenError::Placement(format!("pawn on {sq} is on its own back rank")));
        }
        if sq.row() != piece.color.promotion_row() {
            continue;
        }
        if piece.color != side_to_move {
            return Err(FenError::Placement(format!(
                "{} pawn on {sq} is waiting to promote but {} is to move",
                piece.color.to_human(),
                side_to_move.to_human()
            )));
        }
        if pending.replace(sq).is_some() {
            return Err(FenError::MultiplePromotions);
        }
    }
    Ok(pending)
}
