//! Chess position representation.

use crate::movegen::{is_king_attacked, legal_moves};
use crate::Board;
use chess_core::{
    CastleSide, CastlingRights, Color, FenError, FenRecord, File, Move, MoveFlag, Piece,
    PieceKind, Rank, Square,
};
use thiserror::Error;

/// Reasons a textual position is rejected on import.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{0} has no king")]
    MissingKing(Color),

    #[error("{0} has more than one king")]
    TooManyKings(Color),

    #[error("{0} has more than sixteen pieces")]
    TooManyPieces(Color),

    #[error("{0} has more than eight pawns")]
    TooManyPawns(Color),

    #[error("{0} has more promoted pieces than missing pawns")]
    ImpossibleMaterial(Color),

    #[error("pawn on back rank at {0}")]
    PawnOnBackRank(Square),

    #[error("{0} legal moves exceed what any position allows")]
    TooManyMoves(usize),

    #[error("{color} {side:?} castling right without king and rook on their home squares")]
    CastlingWithoutPieces { color: Color, side: CastleSide },

    #[error("en passant target {0} does not follow a double pawn push")]
    InvalidEnPassant(Square),

    #[error("{0} is in check but it is not their move")]
    OpponentInCheck(Color),
}

/// Most legal moves any chess position can have.
pub const MAX_LEGAL_MOVES: usize = 218;

/// Complete game state at one point in time: board, side to move,
/// castling rights, en passant target and the two move counters.
///
/// Positions are values. The only way to reach a new one is
/// [`apply_move`](crate::apply_move), which checks the move and returns a
/// fresh position; generators and filters only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position: White to move, all castling
    /// rights, no en passant target, clocks at their initial values.
    pub fn startpos() -> Self {
        Position {
            board: Board::standard(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::from_record(FenRecord::parse(fen)?)
    }

    /// Builds a position from parsed FEN fields, rejecting positions that
    /// cannot arise in play.
    pub fn from_record(record: FenRecord) -> Result<Self, PositionError> {
        let position = Position {
            board: Board::from_placement(record.placement),
            side_to_move: record.side_to_move,
            castling: record.castling,
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
        };
        position.validate()?;
        Ok(position)
    }

    fn validate(&self) -> Result<(), PositionError> {
        for color in Color::BOTH {
            let king = Piece::new(PieceKind::King, color);
            match self.board.pieces().filter(|&(_, p)| p == king).count() {
                0 => return Err(PositionError::MissingKing(color)),
                1 => {}
                _ => return Err(PositionError::TooManyKings(color)),
            }
        }

        for color in Color::BOTH {
            self.validate_material(color)?;
        }

        if let Some((sq, _)) = self.board.pieces().find(|&(sq, piece)| {
            piece.kind == PieceKind::Pawn && matches!(sq.rank(), Rank::R1 | Rank::R8)
        }) {
            return Err(PositionError::PawnOnBackRank(sq));
        }

        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if self.castling.has(color, side) && !self.castling_pieces_home(color, side) {
                    return Err(PositionError::CastlingWithoutPieces { color, side });
                }
            }
        }

        if let Some(target) = self.en_passant {
            if !self.en_passant_consistent(target) {
                return Err(PositionError::InvalidEnPassant(target));
            }
        }

        let waiting = self.side_to_move.opposite();
        if is_king_attacked(&self.board, waiting) {
            return Err(PositionError::OpponentInCheck(waiting));
        }

        let moves: usize = self
            .board
            .pieces_of(self.side_to_move)
            .map(|(from, _)| legal_moves(self, from).len())
            .sum();
        if moves > MAX_LEGAL_MOVES {
            return Err(PositionError::TooManyMoves(moves));
        }

        Ok(())
    }

    /// Every piece beyond the initial set must stand in for a promoted pawn.
    fn validate_material(&self, color: Color) -> Result<(), PositionError> {
        let mut counts = [0usize; 6];
        for (_, piece) in self.board.pieces_of(color) {
            counts[piece.kind.index()] += 1;
        }
        if counts.iter().sum::<usize>() > 16 {
            return Err(PositionError::TooManyPieces(color));
        }

        let pawns = counts[PieceKind::Pawn.index()];
        if pawns > 8 {
            return Err(PositionError::TooManyPawns(color));
        }

        let promoted: usize = [
            (PieceKind::Knight, 2),
            (PieceKind::Bishop, 2),
            (PieceKind::Rook, 2),
            (PieceKind::Queen, 1),
        ]
        .into_iter()
        .map(|(kind, initial)| counts[kind.index()].saturating_sub(initial))
        .sum();
        if promoted > 8 - pawns {
            return Err(PositionError::ImpossibleMaterial(color));
        }
        Ok(())
    }

    fn castling_pieces_home(&self, color: Color, side: CastleSide) -> bool {
        let (king_sq, rook_sq) = home_squares(color, side);
        self.board.piece_at(king_sq) == Some(Piece::new(PieceKind::King, color))
            && self.board.piece_at(rook_sq) == Some(Piece::new(PieceKind::Rook, color))
    }

    /// The target must sit behind an enemy pawn that just advanced two
    /// squares, with both squares it crossed now empty.
    fn en_passant_consistent(&self, target: Square) -> bool {
        let pusher = self.side_to_move.opposite();
        let dir = pusher.pawn_direction();
        let expected_rank = (pusher.pawn_rank() as i8 + dir) as u8;
        if target.rank().index() != expected_rank {
            return false;
        }
        let (Some(origin), Some(landed)) = (target.offset(0, -dir), target.offset(0, dir)) else {
            return false;
        };
        self.board.piece_at(target).is_none()
            && self.board.piece_at(origin).is_none()
            && self.board.piece_at(landed) == Some(Piece::new(PieceKind::Pawn, pusher))
    }

    /// Returns the FEN fields of this position.
    pub fn to_record(&self) -> FenRecord {
        FenRecord {
            placement: *self.board.placement(),
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        self.to_record().to_fen()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// The square a pawn may capture onto en passant this ply.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }

    /// Returns true if the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        is_king_attacked(&self.board, self.side_to_move)
    }

    /// Plays a move without checking it, updating rights and counters.
    ///
    /// Callers must pass a move from the legal set; public code goes
    /// through [`apply_move`](crate::apply_move).
    pub(crate) fn successor(&self, m: Move) -> Position {
        let us = self.side_to_move;
        let moving = self.board.piece_at(m.from());
        let is_capture = self.board.piece_at(m.to()).is_some() || m.is_en_passant();
        let is_pawn = matches!(moving, Some(p) if p.kind == PieceKind::Pawn);

        let mut castling = self.castling;
        if matches!(moving, Some(p) if p.kind == PieceKind::King) {
            castling.revoke_all(us);
        }
        // A rook leaving or being taken on its home square ends that right
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                let (_, rook_sq) = home_squares(color, side);
                if m.from() == rook_sq || m.to() == rook_sq {
                    castling.revoke(color, side);
                }
            }
        }

        let en_passant = if m.flag() == MoveFlag::DoublePush {
            m.from().offset(0, us.pawn_direction())
        } else {
            None
        };

        Position {
            board: self.board.with_move_applied(m),
            side_to_move: us.opposite(),
            castling,
            en_passant,
            halfmove_clock: if is_pawn || is_capture {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: match us {
                Color::White => self.fullmove_number,
                Color::Black => self.fullmove_number.saturating_add(1),
            },
        }
    }
}

/// Returns the (king, rook) home squares for one castling right.
pub(crate) fn home_squares(color: Color, side: CastleSide) -> (Square, Square) {
    let rank = Rank::ALL[color.back_rank() as usize];
    let rook_file = match side {
        CastleSide::Kingside => File::H,
        CastleSide::Queenside => File::A,
    };
    (Square::new(File::E, rank), Square::new(rook_file, rank))
}

/// Returns the king's destination for castling on `side`.
pub(crate) fn castle_target(color: Color, side: CastleSide) -> Square {
    let rank = Rank::ALL[color.back_rank() as usize];
    match side {
        CastleSide::Kingside => Square::new(File::G, rank),
        CastleSide::Queenside => Square::new(File::C, rank),
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
