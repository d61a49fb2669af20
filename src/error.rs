//! Error types for rejected calls and malformed positions

use crate::types::{Color, PieceType, Square};

/// Why a move or promotion request was declined. The game state is unchanged
/// whenever one of these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    NoPiece(Square),

    #[error("the piece on {square} belongs to {owner:?}, but it is {to_move:?}'s turn")]
    NotYourPiece {
        square: Square,
        owner: Color,
        to_move: Color,
    },

    #[error("a promotion on {0} must be resolved first")]
    PromotionPending(Square),

    #[error("the game is over")]
    GameOver,

    #[error("{to} is not a legal destination from {from}")]
    IllegalDestination { from: Square, to: Square },

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("cannot promote to {0:?}")]
    InvalidPromotionPiece(PieceType),
}

/// Problems found while reading a FEN string
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN must have 6 space separated fields, found {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid side to move `{0}`")]
    SideToMove(String),

    #[error("invalid castling field `{0}`")]
    Castling(String),

    #[error("invalid en passant field `{0}`")]
    EnPassant(String),

    #[error("invalid move clock `{0}`")]
    Clock(String),

    #[error("expected exactly one {color:?} king, found {count}")]
    KingCount { color: Color, count: usize },

    #[error("the {0:?} king is attacked but it is not {0:?}'s turn")]
    KingCapturable(Color),

    #[error("more than one pawn is waiting to promote")]
    MultiplePromotions,
}
