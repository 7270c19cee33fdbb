//! Standard chess rules implementation.

use super::{DrawReason, GameError, GameStatus, RuleSet};
use crate::movegen::{self, MoveList};
use crate::Position;
use chess_core::{Color, Move, PieceKind, Square};
use tracing::debug;

/// Standard chess rules.
///
/// - Piece movement with castling, en passant and promotion
/// - Moves leaving the own king attacked are illegal
/// - Checkmate and stalemate
/// - Fifty-move rule and insufficient material as automatic draws
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl StandardChess {
    /// Returns true if `color` is down to a bare king or a king and one
    /// minor piece.
    fn has_mating_shortfall(position: &Position, color: Color) -> bool {
        let mut minors = 0;
        for (_, piece) in position.board().pieces_of(color) {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors += 1,
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
        minors <= 1
    }
}

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn legal_moves(&self, position: &Position, from: Square) -> MoveList {
        movegen::legal_moves(position, from)
    }

    fn legal_moves_all(&self, position: &Position) -> MoveList {
        movegen::legal_moves_all(position)
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        Color::BOTH
            .into_iter()
            .all(|color| Self::has_mating_shortfall(position, color))
    }

    fn status(&self, position: &Position) -> GameStatus {
        let in_check = position.is_in_check();

        if !movegen::has_legal_move(position) {
            return if in_check {
                GameStatus::Checkmate {
                    winner: position.side_to_move().opposite(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        if self.is_insufficient_material(position) {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if position.halfmove_clock() >= 100 {
            return GameStatus::Draw(DrawReason::FiftyMoveRule);
        }

        if in_check {
            GameStatus::Check(position.side_to_move())
        } else {
            GameStatus::Ongoing
        }
    }

    fn apply_move(&self, position: &Position, m: Move) -> Result<Position, GameError> {
        let status = self.status(position);
        if status.is_terminal() {
            return Err(GameError::GameOver(status));
        }
        if !self.is_legal(position, m) {
            return Err(GameError::IllegalMove(m));
        }

        let next = position.successor(m);
        debug!(mv = %m, fen = %next.to_fen(), "applied move");
        Ok(next)
    }
}
