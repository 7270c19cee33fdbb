//! Filtering pseudo-legal moves down to legal ones.

use super::{is_king_attacked, is_square_attacked, pseudo_legal_moves, MoveList};
use crate::Position;
use chess_core::{Move, Square};

/// Returns true if a pseudo-legal move keeps the mover's king safe.
///
/// The move is simulated on a scratch copy of the board and the king of the
/// mover is tested for attack afterwards. Castling additionally requires
/// that the king does not start in, pass through or land on an attacked
/// square.
fn keeps_king_safe(position: &Position, m: Move) -> bool {
    let board = position.board();
    let Some(piece) = board.piece_at(m.from()) else {
        return false;
    };
    let us = piece.color;
    let them = us.opposite();

    if m.is_castle() {
        let step: i8 = if m.to().file().index() > m.from().file().index() {
            1
        } else {
            -1
        };
        let pass_through = m.from().offset(step, 0);
        let crossed = [Some(m.from()), pass_through, Some(m.to())];
        if crossed
            .into_iter()
            .flatten()
            .any(|sq| is_square_attacked(board, sq, them))
        {
            return false;
        }
    }

    !is_king_attacked(&board.with_move_applied(m), us)
}

/// Returns the legal moves of the piece on `from`.
///
/// Only pieces of the side to move have legal moves; any other square,
/// including an empty one, yields an empty list.
pub fn legal_moves(position: &Position, from: Square) -> MoveList {
    if !position.board().is_color(from, position.side_to_move()) {
        return MoveList::new();
    }
    let mut moves = pseudo_legal_moves(position, from);
    moves.retain(|&m| keeps_king_safe(position, m));
    moves
}

/// Returns every legal move of the side to move.
pub fn legal_moves_all(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    for (from, _) in position.board().pieces_of(position.side_to_move()) {
        moves.extend_from(&legal_moves(position, from));
    }
    moves
}

/// Returns true if the side to move has at least one legal move.
///
/// Stops at the first legal move found.
pub fn has_legal_move(position: &Position) -> bool {
    position
        .board()
        .pieces_of(position.side_to_move())
        .any(|(from, _)| !legal_moves(position, from).is_empty())
}

/// Returns true if `m` is among the legal moves of the position.
pub fn is_legal(position: &Position, m: Move) -> bool {
    legal_moves(position, m.from()).contains(&m)
}
