use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Row delta of a pawn step. White starts at the bottom (row 7) and moves up.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Row the pawns of this color start on
    pub fn pawn_start_row(&self) -> usize {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Farthest row for this color's pawns, where they promote
    pub fn promotion_row(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    pub fn back_row(&self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Case insensitive, so both FEN halves parse with it.
    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'r' => Some(PieceType::Rook),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(
            *self,
            PieceType::Rook | PieceType::Bishop | PieceType::Queen
        )
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Pawn => 0,
            Self::Rook => 1,
            Self::Knight => 2,
            Self::Bishop => 3,
            Self::Queen => 4,
            Self::King => 5,
        }
    }
}

pub const PIECES_CAN_PROMOTE_TO: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// Uppercase for white, lowercase for black
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, piece_type })
    }

    pub fn to_fen_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        let is_white = self.color == Color::White;
        match self.piece_type {
            PieceType::Pawn => {
                if is_white {
                    "♙"
                } else {
                    "♟︎"
                }
            }
            PieceType::Rook => {
                if is_white {
                    "♖"
                } else {
                    "♜"
                }
            }
            PieceType::Knight => {
                if is_white {
                    "♘"
                } else {
                    "♞"
                }
            }
            PieceType::Bishop => {
                if is_white {
                    "♗"
                } else {
                    "♝"
                }
            }
            PieceType::Queen => {
                if is_white {
                    "♕"
                } else {
                    "♛"
                }
            }
            PieceType::King => {
                if is_white {
                    "♔"
                } else {
                    "♚"
                }
            }
        }
    }

    pub fn to_human(&self) -> String {
        format!("{} {}", self.color.to_human(), self.piece_type.to_human())
    }
}

/// A square on the board. Row 0 is black's back rank, column 0 is the a-file.
///
/// The fields are private so that a `Square` is always on the board.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// For coordinates the caller already knows are on the board
    pub(crate) const fn at(row: usize, col: usize) -> Square {
        debug_assert!(row < 8 && col < 8);
        Square {
            row: row as u8,
            col: col as u8,
        }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn col(&self) -> usize {
        self.col as usize
    }

    pub fn index(&self) -> usize {
        self.row() * 8 + self.col()
    }

    pub fn from_index(index: usize) -> Option<Square> {
        Square::new(index / 8, index % 8)
    }

    /// Square `(dr, dc)` away, if it is still on the board
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut char_iter = s.chars();
        let file_char = char_iter.next()?;
        let rank_char = char_iter.next()?;
        if char_iter.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return None;
        }
        let col = file_char as u8 - b'a';
        let rank = rank_char as u8 - b'0';
        Some(Square { row: 8 - rank, col })
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }

    /// All 64 squares, row by row from the top left
    pub fn all() -> impl Iterator<Item = Square> {
        itertools::iproduct!(0..8u8, 0..8u8).map(|(row, col)| Square { row, col })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}

impl CastlingSide {
    pub const BOTH: [CastlingSide; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    /// Column the king lands on
    pub fn king_destination_col(&self) -> usize {
        match self {
            Self::Kingside => 6,
            Self::Queenside => 2,
        }
    }

    /// Original rook column and the column it lands on after castling
    pub fn rook_cols(&self) -> (usize, usize) {
        match self {
            Self::Kingside => (7, 5),
            Self::Queenside => (0, 3),
        }
    }
}

/// Record of the most recent two-square pawn advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoubleStep {
    pub from: Square,
    pub to: Square,
}

impl DoubleStep {
    /// The square the pawn skipped over, which is where an en passant capture lands
    pub fn skipped_square(&self) -> Square {
        Square::at((self.from.row() + self.to.row()) / 2, self.from.col())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveFlag {
    Regular,
    CastleKingside,
    CastleQueenside,
    DoublePawnPush,
    EnPassantCapture,
}

impl MoveFlag {
    pub fn is_castle(&self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// What happened when a move was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Piece>,
    pub move_flag: MoveFlag,
    /// The pawn reached its farthest row and is waiting for a promotion choice
    pub promotion_pending: bool,
    /// The side now to move is in check. Always false while a promotion is pending.
    pub gives_check: bool,
}

impl MoveReport {
    pub fn to_human(&self) -> String {
        if let MoveFlag::CastleKingside = self.move_flag {
            return format!("{} castles kingside", self.piece.color.to_human());
        }
        if let MoveFlag::CastleQueenside = self.move_flag {
            return format!("{} castles queenside", self.piece.color.to_human());
        }
        let maybe_capture_str = match self.captured {
            Some(p) => format!(" capturing {}", p.to_human()),
            None => "".to_string(),
        };
        let maybe_en_passant_str = if self.move_flag == MoveFlag::EnPassantCapture {
            " en passant"
        } else {
            ""
        };
        format!(
            "{} moves {} from {} to {}{}{}",
            self.piece.color.to_human(),
            self.piece.piece_type.to_human(),
            self.from,
            self.to,
            maybe_capture_str,
            maybe_en_passant_str,
        )
    }
}

/// Summary of the game, in the priority a status line shows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    Check,
    AwaitingPromotion,
    /// Contains the winner
    Checkmate(Color),
    Stalemate,
    InsufficientMaterial,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::Checkmate(_) | Status::Stalemate | Status::InsufficientMaterial
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Some(Color::White));
        assert_eq!(Color::from_char('b'), Some(Color::Black));
        assert_eq!(Color::from_char('g'), None);
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_piece_type_from_char() {
        assert_eq!(PieceType::from_char('p'), Some(PieceType::Pawn));
        assert_eq!(PieceType::from_char('R'), Some(PieceType::Rook));
        assert_eq!(PieceType::from_char('n'), Some(PieceType::Knight));
        assert_eq!(PieceType::from_char('B'), Some(PieceType::Bishop));
        assert_eq!(PieceType::from_char('Q'), Some(PieceType::Queen));
        assert_eq!(PieceType::from_char('k'), Some(PieceType::King));
        assert_eq!(PieceType::from_char('x'), None);
    }

    #[test]
    fn test_is_sliding() {
        assert!(!PieceType::Pawn.is_sliding());
        assert!(PieceType::Rook.is_sliding());
        assert!(PieceType::Bishop.is_sliding());
        assert!(!PieceType::Knight.is_sliding());
        assert!(PieceType::Queen.is_sliding());
        assert!(!PieceType::King.is_sliding());
    }

    #[test]
    fn test_piece_fen_chars() {
        assert_eq!(
            Piece::from_fen_char('N'),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
        assert_eq!(
            Piece::from_fen_char('q'),
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(Piece::from_fen_char('3'), None);
        assert_eq!(Piece::new(Color::Black, PieceType::King).to_fen_char(), 'k');
    }

    #[test]
    fn test_square_from_algebraic() {
        assert_eq!(Square::from_algebraic("a8"), Square::new(0, 0));
        assert_eq!(Square::from_algebraic("e2"), Square::new(6, 4));
        assert_eq!(Square::from_algebraic("h1"), Square::new(7, 7));
        assert_eq!(Square::from_algebraic("i1"), None);
        assert_eq!(Square::from_algebraic("a9"), None);
        assert_eq!(Square::from_algebraic("a10"), None);
        assert_eq!(Square::from_algebraic(""), None);
    }

    #[test]
    fn test_square_round_trips_through_algebraic() {
        for sq in Square::all() {
            assert_eq!(Square::from_algebraic(&sq.to_algebraic()), Some(sq));
        }
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(8, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        let corner = Square::new(0, 0).unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(1, 2), Square::new(1, 2));
        assert_eq!(Square::from_index(63), Square::new(7, 7));
        assert_eq!(Square::from_index(64), None);
    }

    #[test]
    fn test_skipped_square() {
        let step = DoubleStep {
            from: Square::from_algebraic("e2").unwrap(),
            to: Square::from_algebraic("e4").unwrap(),
        };
        assert_eq!(step.skipped_square(), Square::from_algebraic("e3").unwrap());
    }

    #[test]
    fn test_castle_move_report() {
        let report = MoveReport {
            piece: Piece::new(Color::Black, PieceType::King),
            from: Square::from_algebraic("e8").unwrap(),
            to: Square::from_algebraic("c8").unwrap(),
            captured: None,
            move_flag: MoveFlag::CastleQueenside,
            promotion_pending: false,
            gives_check: false,
        };
        assert!(report.move_flag.is_castle());
        assert_eq!(report.to_human(), "black castles queenside");
    }
}
