use itertools::Itertools;

use crate::error::FenError;
use crate::types::*;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The 8x8 grid. This is a plain value: probing a move builds a new board and
/// leaves the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard initial arrangement
    pub fn new() -> Board {
        let mut board = Board::empty();
        for (col, piece_type) in BACK_RANK.into_iter().enumerate() {
            for color in [Color::White, Color::Black] {
                board.squares[color.back_row()][col] = Some(Piece::new(color, piece_type));
                board.squares[color.pawn_start_row()][col] =
                    Some(Piece::new(color, PieceType::Pawn));
            }
        }
        board
    }

    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Parse the piece placement field of a FEN string
    pub fn from_placement(placement: &str) -> Result<Board, FenError> {
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::Placement(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (row, row_str) in rows.into_iter().enumerate() {
            let mut col = 0usize;
            for piece_char in row_str.chars() {
                if let Some(skip) = piece_char.to_digit(10) {
                    col += skip as usize;
                } else if let Some(piece) = Piece::from_fen_char(piece_char) {
                    if col >= 8 {
                        return Err(FenError::Placement(format!("row {} is too long", row + 1)));
                    }
                    board.squares[row][col] = Some(piece);
                    col += 1;
                } else {
                    return Err(FenError::Placement(format!(
                        "unexpected char `{piece_char}`"
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::Placement(format!(
                    "row {} covers {col} squares",
                    row + 1
                )));
            }
        }
        Ok(board)
    }

    /// Piece placement field of a FEN string
    pub fn to_placement(&self) -> String {
        self.squares
            .iter()
            .map(|row| {
                let mut row_str = String::new();
                let mut empty_run = 0;
                for square in row {
                    match square {
                        Some(piece) => {
                            if empty_run > 0 {
                                row_str.push_str(&empty_run.to_string());
                                empty_run = 0;
                            }
                            row_str.push(piece.to_fen_char());
                        }
                        None => empty_run += 1,
                    }
                }
                if empty_run > 0 {
                    row_str.push_str(&empty_run.to_string());
                }
                row_str
            })
            .join("/")
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row()][sq.col()]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row()][sq.col()] = piece;
    }

    /// Remove and return whatever stands on `sq`
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row()][sq.col()].take()
    }

    /// Every occupied square with its piece, row by row from the top
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// A copy of this board with the piece on `from` relocated to `to`,
    /// replacing whatever was there. `also_remove` clears one more square,
    /// which is how an en passant capture is tried.
    pub fn with_relocation(&self, from: Square, to: Square, also_remove: Option<Square>) -> Board {
        let mut after = *self;
        if let Some(extra) = also_remove {
            after.set(extra, None);
        }
        let moving = after.take(from);
        after.set(to, moving);
        after
    }

    pub fn draw_board(&self) -> String {
        self.draw_with_marks(|_| None)
    }

    /// Draw the board with `O` on each of `destinations` and `X` where one of
    /// them holds a piece
    pub fn draw_destinations(&self, destinations: &[Square]) -> String {
        self.draw_with_marks(|sq| {
            if !destinations.contains(&sq) {
                None
            } else if self.is_empty(sq) {
                Some("O")
            } else {
                Some("X")
            }
        })
    }

    fn draw_with_marks<'a>(&'a self, mark: impl Fn(Square) -> Option<&'a str>) -> String {
        let mut string = String::new();

        for row in 0..8 {
            string.push_str(&format!("{} ", 8 - row));
            let cells = (0..8)
                .filter_map(|col| Square::new(row, col))
                .map(|sq| match (mark(sq), self.piece_at(sq)) {
                    (Some(m), _) => m.to_string(),
                    (None, Some(p)) => p.to_symbol().to_string(),
                    (None, None) => ".".to_string(),
                })
                .join(" ");
            string.push_str(&cells);
            string.push('\n');
        }
        string.push_str("  a b c d e f g h\n");
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}
