use crate::attacks::is_attacked;
use crate::error::FenError;
use crate::game::GameState;
use crate::types::*;

/// Which castles are still possible, as far as king and rook history goes.
///
/// A right is lost for good once its king or rook leaves its original square
/// or the rook is captured there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastlingRights {
    pub fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn allows(&self, color: Color, side: CastlingSide) -> bool {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => self.white_kingside,
            (Color::White, CastlingSide::Queenside) => self.white_queenside,
            (Color::Black, CastlingSide::Kingside) => self.black_kingside,
            (Color::Black, CastlingSide::Queenside) => self.black_queenside,
        }
    }

    fn revoke(&mut self, color: Color, side: CastlingSide) {
        match (color, side) {
            (Color::White, CastlingSide::Kingside) => self.white_kingside = false,
            (Color::White, CastlingSide::Queenside) => self.white_queenside = false,
            (Color::Black, CastlingSide::Kingside) => self.black_kingside = false,
            (Color::Black, CastlingSide::Queenside) => self.black_queenside = false,
        }
    }

    /// Something left or was captured on `sq`. Only king and rook origin
    /// squares matter, anything else is ignored.
    pub fn revoke_for_square(&mut self, sq: Square) {
        for color in [Color::White, Color::Black] {
            if sq.row() != color.back_row() {
                continue;
            }
            if sq.col() == KING_COL {
                self.revoke(color, CastlingSide::Kingside);
                self.revoke(color, CastlingSide::Queenside);
            }
            for side in CastlingSide::BOTH {
                if sq.col() == side.rook_cols().0 {
                    self.revoke(color, side);
                }
            }
        }
    }

    pub fn from_fen(field: &str) -> Result<Self, FenError> {
        let mut rights = Self::none();
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            let slot = match c {
                'K' => &mut rights.white_kingside,
                'Q' => &mut rights.white_queenside,
                'k' => &mut rights.black_kingside,
                'q' => &mut rights.black_queenside,
                _ => return Err(FenError::Castling(field.to_string())),
            };
            if *slot {
                return Err(FenError::Castling(field.to_string()));
            }
            *slot = true;
        }
        if field.is_empty() {
            return Err(FenError::Castling(field.to_string()));
        }
        Ok(rights)
    }

    pub fn to_fen(&self) -> String {
        let mut res = String::new();
        if self.white_kingside {
            res.push('K');
        }
        if self.white_queenside {
            res.push('Q');
        }
        if self.black_kingside {
            res.push('k');
        }
        if self.black_queenside {
            res.push('q');
        }
        if res.is_empty() {
            res.push('-');
        }
        res
    }
}

const KING_COL: usize = 4;

/// Can `color` castle on `side` right now.
///
/// Needs the right to still be held, king and rook on their original squares,
/// nothing between them, the king not in check, and neither the square the
/// king crosses nor the one it lands on attacked. A failed check revokes
/// nothing.
pub fn can_castle(state: &GameState, color: Color, side: CastlingSide) -> bool {
    if !state.castling_rights().allows(color, side) {
        return false;
    }

    let board = state.board();
    let row = color.back_row();
    let king_from = Square::at(row, KING_COL);
    if board.piece_at(king_from) != Some(Piece::new(color, PieceType::King)) {
        return false;
    }

    let opponent = color.other_color();
    if is_attacked(board, king_from, opponent) {
        return false;
    }

    let (rook_col, _) = side.rook_cols();
    if board.piece_at(Square::at(row, rook_col)) != Some(Piece::new(color, PieceType::Rook)) {
        return false;
    }

    let between = if rook_col < KING_COL {
        rook_col + 1..KING_COL
    } else {
        KING_COL + 1..rook_col
    };
    if between.into_iter().any(|col| !board.is_empty(Square::at(row, col))) {
        return false;
    }

    // the king's path: the square it crosses, then where it lands
    let step: i8 = match side {
        CastlingSide::Kingside => 1,
        CastlingSide::Queenside => -1,
    };
    [step, 2 * step].into_iter().all(|dc| match king_from.offset(0, dc) {
        Some(target) => {
            let after = board.with_relocation(king_from, target, None);
            !is_attacked(&after, target, opponent)
        }
        None => false,
    })
}
