//! Move generation.
//!
//! Generation happens in two stages. [`pseudo_legal_moves`] applies the
//! movement geometry of each piece: direction sets, obstruction, captures,
//! pawn pushes, castling prerequisites. [`legal_moves`] then removes every
//! move that would leave the mover's own king attacked.

mod attacks;
mod legality;
pub mod perft;

use crate::Position;
use chess_core::{CastleSide, Color, Move, MoveFlag, Piece, PieceKind, Square};

pub use attacks::{
    attacked_squares, is_king_attacked, is_square_attacked, king_attacks, knight_attacks,
    pawn_attacks, piece_attacks, ray_attacks, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS,
    ROOK_DIRECTIONS,
};
pub use legality::{has_legal_move, is_legal, legal_moves, legal_moves_all};

use crate::position::{castle_target, home_squares};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation. Imported
/// positions are checked against that bound before any list is built.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns true if the list holds the move.
    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    /// Iterates over the moves.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }

    /// Appends every move of another list.
    pub fn extend_from(&mut self, other: &MoveList) {
        for &m in other {
            self.push(m);
        }
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates the pseudo-legal moves of the piece on `from`.
///
/// The moves obey piece geometry only and may leave the mover in check.
/// An empty square yields an empty list. Castling and en passant are only
/// produced for the side to move, since the rights and target they depend
/// on belong to the current ply.
pub fn pseudo_legal_moves(position: &Position, from: Square) -> MoveList {
    let mut moves = MoveList::new();
    let Some(piece) = position.piece_at(from) else {
        return moves;
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(position, from, piece.color, &mut moves),
        PieceKind::Knight | PieceKind::King => {
            let targets = match piece.kind {
                PieceKind::Knight => knight_attacks(from),
                _ => king_attacks(from),
            };
            for to in targets {
                if !position.board().is_color(to, piece.color) {
                    moves.push(Move::normal(from, to));
                }
            }
            if piece.kind == PieceKind::King {
                generate_castling_moves(position, from, piece.color, &mut moves);
            }
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            for to in piece_attacks(position.board(), from, piece) {
                if !position.board().is_color(to, piece.color) {
                    moves.push(Move::normal(from, to));
                }
            }
        }
    }

    moves
}

/// Pushes a pawn move, expanding it into the four promotions when it
/// reaches the last rank.
fn push_pawn_move(moves: &mut MoveList, from: Square, to: Square, color: Color, flag: MoveFlag) {
    if to.rank().index() == color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            if let Some(m) = Move::promoting(from, to, kind) {
                moves.push(m);
            }
        }
    } else {
        moves.push(Move::new(from, to, flag));
    }
}

fn generate_pawn_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    let board = position.board();
    let forward = color.pawn_direction();

    // Pushes
    if let Some(one) = from.offset(0, forward) {
        if board.piece_at(one).is_none() {
            push_pawn_move(moves, from, one, color, MoveFlag::Normal);

            if from.rank().index() == color.pawn_rank() {
                if let Some(two) = one.offset(0, forward) {
                    if board.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    // Captures
    for to in pawn_attacks(from, color) {
        if board.is_color(to, color.opposite()) {
            push_pawn_move(moves, from, to, color, MoveFlag::Normal);
        }
    }

    // En passant
    if color == position.side_to_move() {
        if let Some(target) = position.en_passant() {
            let victim = Square::new(target.file(), from.rank());
            if pawn_attacks(from, color).contains(target)
                && board.piece_at(victim) == Some(Piece::new(PieceKind::Pawn, color.opposite()))
            {
                moves.push(Move::new(from, target, MoveFlag::EnPassant));
            }
        }
    }
}

/// Adds castling candidates: the right is still held, king and rook stand
/// on their home squares and every square between them is empty. Whether
/// the king crosses an attacked square is decided by the legality filter.
fn generate_castling_moves(position: &Position, from: Square, color: Color, moves: &mut MoveList) {
    if color != position.side_to_move() {
        return;
    }

    let board = position.board();
    for side in CastleSide::BOTH {
        if !position.castling().has(color, side) {
            continue;
        }
        let (king_home, rook_home) = home_squares(color, side);
        if from != king_home
            || board.piece_at(rook_home) != Some(Piece::new(PieceKind::Rook, color))
        {
            continue;
        }

        let step: i8 = match side {
            CastleSide::Kingside => 1,
            CastleSide::Queenside => -1,
        };
        let mut path_clear = true;
        let mut current = king_home.offset(step, 0);
        while let Some(sq) = current {
            if sq == rook_home {
                break;
            }
            if board.piece_at(sq).is_some() {
                path_clear = false;
                break;
            }
            current = sq.offset(step, 0);
        }

        if path_clear {
            let flag = match side {
                CastleSide::Kingside => MoveFlag::CastleKingside,
                CastleSide::Queenside => MoveFlag::CastleQueenside,
            };
            moves.push(Move::new(king_home, castle_target(color, side), flag));
        }
    }
}
