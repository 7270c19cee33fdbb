//! Piece placement.

use crate::SquareSet;
use chess_core::{Color, File, Move, MoveFlag, Piece, PieceKind, Rank, Square};
use std::fmt;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The contents of the 64 squares, at most one piece per square.
///
/// A board is plain data. It does not know whose turn it is and never
/// checks chess rules; [`Board::with_move_applied`] is the one operation
/// that understands special moves, and it returns a new board instead of
/// mutating the receiver.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting arrangement.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
            for color in Color::BOTH {
                let back = Rank::ALL[color.back_rank() as usize];
                let pawns = Rank::ALL[color.pawn_rank() as usize];
                board.place(Square::new(file, back), Piece::new(kind, color));
                board.place(
                    Square::new(file, pawns),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }
        board
    }

    /// Creates a board from a square-indexed array (a1 = 0).
    pub const fn from_placement(squares: [Option<Piece>; 64]) -> Self {
        Board { squares }
    }

    /// Returns the square-indexed contents (a1 = 0).
    pub const fn placement(&self) -> &[Option<Piece>; 64] {
        &self.squares
    }

    /// Returns the piece on the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize]
    }

    /// Puts a piece on a square, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: Piece) {
        self.squares[sq.index() as usize] = Some(piece);
    }

    /// Empties a square, returning the piece that stood on it.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index() as usize].take()
    }

    /// Returns true if the square holds a piece of the given color.
    #[inline]
    pub fn is_color(&self, sq: Square, color: Color) -> bool {
        matches!(self.piece_at(sq), Some(p) if p.color == color)
    }

    /// Iterates over every occupied square and its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Returns the set of occupied squares.
    pub fn occupied(&self) -> SquareSet {
        self.pieces().map(|(sq, _)| sq).collect()
    }

    /// Returns the square of the given color's king.
    ///
    /// With more than one king of that color the lowest square wins; such
    /// boards are rejected when a position is imported.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        self.pieces()
            .find(|&(_, piece)| piece == king)
            .map(|(sq, _)| sq)
    }

    /// Returns a copy of this board with the move played on it.
    ///
    /// Handles captures, promotion, the rook half of castling and removal of
    /// the pawn taken en passant. Legality is not checked; moving from an
    /// empty square yields an unchanged copy.
    pub fn with_move_applied(&self, m: Move) -> Board {
        let mut next = self.clone();
        let Some(piece) = next.remove(m.from()) else {
            return next;
        };

        let landed = match m.promotion() {
            Some(kind) => Piece::new(kind, piece.color),
            None => piece,
        };
        next.place(m.to(), landed);

        match m.flag() {
            MoveFlag::EnPassant => {
                next.remove(Square::new(m.to().file(), m.from().rank()));
            }
            MoveFlag::CastleKingside | MoveFlag::CastleQueenside => {
                let (rook_from, rook_to) = castle_rook_squares(m);
                if let Some(rook) = next.remove(rook_from) {
                    next.place(rook_to, rook);
                }
            }
            _ => {}
        }

        next
    }
}

/// Returns the rook's (from, to) squares for a castling move.
fn castle_rook_squares(m: Move) -> (Square, Square) {
    let rank = m.from().rank();
    match m.flag() {
        MoveFlag::CastleQueenside => (Square::new(File::A, rank), Square::new(File::D, rank)),
        _ => (Square::new(File::H, rank), Square::new(File::F, rank)),
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    /// Eight ranks, rank 8 first, FEN letters with `.` for empty squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let row: String = File::ALL
                .into_iter()
                .map(|file| {
                    self.piece_at(Square::new(file, rank))
                        .map_or('.', Piece::to_fen_char)
                })
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board(")?;
        write!(f, "{}", self)?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn standard_layout() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.piece_at(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(board.piece_at(sq("e4")), None);
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.occupied().len(), 32);
    }

    #[test]
    fn place_and_remove() {
        let mut board = Board::empty();
        let knight = Piece::new(PieceKind::Knight, Color::Black);
        board.place(sq("c6"), knight);
        assert!(board.is_color(sq("c6"), Color::Black));
        assert!(!board.is_color(sq("c6"), Color::White));
        assert_eq!(board.remove(sq("c6")), Some(knight));
        assert_eq!(board.remove(sq("c6")), None);
    }

    #[test]
    fn with_move_applied_leaves_receiver_untouched() {
        let board = Board::standard();
        let after = board.with_move_applied(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush));
        assert_eq!(board, Board::standard());
        assert_eq!(after.piece_at(sq("e2")), None);
        assert_eq!(
            after.piece_at(sq("e4")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
    }

    #[test]
    fn with_move_applied_castles_rook() {
        let mut board = Board::empty();
        board.place(Square::E8, Piece::new(PieceKind::King, Color::Black));
        board.place(Square::A8, Piece::new(PieceKind::Rook, Color::Black));
        let after =
            board.with_move_applied(Move::new(Square::E8, Square::C8, MoveFlag::CastleQueenside));
        assert_eq!(
            after.piece_at(Square::C8),
            Some(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(
            after.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Rook, Color::Black))
        );
        assert_eq!(after.piece_at(Square::A8), None);
    }

    #[test]
    fn with_move_applied_en_passant_and_promotion() {
        let mut board = Board::empty();
        board.place(sq("e5"), Piece::new(PieceKind::Pawn, Color::White));
        board.place(sq("d5"), Piece::new(PieceKind::Pawn, Color::Black));
        let after = board.with_move_applied(Move::new(sq("e5"), sq("d6"), MoveFlag::EnPassant));
        assert_eq!(after.piece_at(sq("d5")), None);
        assert!(after.is_color(sq("d6"), Color::White));

        let mut board = Board::empty();
        board.place(sq("b2"), Piece::new(PieceKind::Pawn, Color::Black));
        let promo = Move::promoting(sq("b2"), sq("b1"), PieceKind::Knight).unwrap();
        let after = board.with_move_applied(promo);
        assert_eq!(
            after.piece_at(sq("b1")),
            Some(Piece::new(PieceKind::Knight, Color::Black))
        );
    }

    #[test]
    fn move_from_empty_square_is_noop() {
        let board = Board::standard();
        let after = board.with_move_applied(Move::normal(sq("e4"), sq("e5")));
        assert_eq!(after, board);
    }

    #[test]
    fn display_uses_dots() {
        let text = Board::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "rnbqkbnr");
        assert_eq!(lines[3], "........");
        assert_eq!(lines[7], "RNBQKBNR");
    }
}
