//! Game rules: turn order, move application and position classification.
//!
//! The [`RuleSet`] trait bundles everything a session needs from the rules
//! of the game. [`StandardChess`] implements it, and the free functions in
//! this module are shorthands for the standard rules.

mod standard;

pub use standard::StandardChess;

use crate::notation::NotationError;
use crate::{MoveList, Position};
use chess_core::{Color, Move, Square};
use std::fmt;
use thiserror::Error;

/// Reason a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// The same position occurred three times. Only a [`Game`](crate::Game)
    /// sees enough history to report this.
    ThreefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::ThreefoldRepetition => "threefold repetition",
        };
        f.write_str(text)
    }
}

/// Reason a side lost without being mated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForfeitReason {
    /// The side's clock ran out.
    Timeout,
    /// The side resigned.
    Resignation,
}

impl fmt::Display for ForfeitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForfeitReason::Timeout => f.write_str("timeout"),
            ForfeitReason::Resignation => f.write_str("resignation"),
        }
    }
}

/// Classification of a position or game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// Play continues and the side to move is not in check.
    Ongoing,
    /// Play continues; the given side is in check.
    Check(Color),
    /// The side to move is mated.
    Checkmate { winner: Color },
    /// The side to move has no legal move but is not in check.
    Stalemate,
    /// Drawn by rule.
    Draw(DrawReason),
    /// Ended by an outside event such as a flag fall.
    Forfeit { winner: Color, reason: ForfeitReason },
}

impl GameStatus {
    /// Returns true if no further moves may be played.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check(_))
    }

    /// Returns the winning side, if the game was decided.
    pub const fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { winner } | GameStatus::Forfeit { winner, .. } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => f.write_str("ongoing"),
            GameStatus::Check(color) => write!(f, "{color} is in check"),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameStatus::Stalemate => f.write_str("stalemate"),
            GameStatus::Draw(reason) => write!(f, "draw by {reason}"),
            GameStatus::Forfeit { winner, reason } => write!(f, "{winner} wins by {reason}"),
        }
    }
}

/// Errors returned when a move cannot be played.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("game is over: {0}")]
    GameOver(GameStatus),

    #[error(transparent)]
    InvalidNotation(#[from] NotationError),
}

/// The rules a game session is played under.
///
/// # Example
///
/// ```
/// use chess_rules::rules::{GameStatus, RuleSet, StandardChess};
///
/// let position = StandardChess.initial_position();
/// assert_eq!(StandardChess.legal_moves_all(&position).len(), 20);
/// assert_eq!(StandardChess.status(&position), GameStatus::Ongoing);
/// ```
pub trait RuleSet {
    /// Returns the position a new game starts from.
    fn initial_position(&self) -> Position;

    /// Returns the legal moves of the piece on `from`.
    fn legal_moves(&self, position: &Position, from: Square) -> MoveList;

    /// Returns every legal move of the side to move.
    fn legal_moves_all(&self, position: &Position) -> MoveList;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.legal_moves(position, m.from()).contains(&m)
    }

    /// Returns true if neither side has enough material to mate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Classifies the position.
    fn status(&self, position: &Position) -> GameStatus;

    /// Plays a legal move and returns the resulting position.
    ///
    /// Fails with [`GameError::GameOver`] when the position is already
    /// terminal and with [`GameError::IllegalMove`] when `m` is not in the
    /// legal set. The input position is never modified.
    fn apply_move(&self, position: &Position, m: Move) -> Result<Position, GameError>;
}

/// Returns the standard starting position.
pub fn new_game() -> Position {
    StandardChess.initial_position()
}

/// Classifies a position under the standard rules.
pub fn status(position: &Position) -> GameStatus {
    StandardChess.status(position)
}

/// Plays a move under the standard rules.
pub fn apply_move(position: &Position, m: Move) -> Result<Position, GameError> {
    StandardChess.apply_move(position, m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!GameStatus::Ongoing.is_terminal());
        assert!(!GameStatus::Check(Color::White).is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
        assert!(GameStatus::Draw(DrawReason::FiftyMoveRule).is_terminal());
        assert!(GameStatus::Checkmate {
            winner: Color::Black
        }
        .is_terminal());
    }

    #[test]
    fn winners() {
        assert_eq!(GameStatus::Stalemate.winner(), None);
        assert_eq!(
            GameStatus::Forfeit {
                winner: Color::White,
                reason: ForfeitReason::Timeout
            }
            .winner(),
            Some(Color::White)
        );
    }

    #[test]
    fn status_text() {
        assert_eq!(
            GameStatus::Checkmate {
                winner: Color::White
            }
            .to_string(),
            "checkmate, White wins"
        );
        assert_eq!(
            GameStatus::Draw(DrawReason::InsufficientMaterial).to_string(),
            "draw by insufficient material"
        );
    }

    #[test]
    fn new_game_is_startpos() {
        assert_eq!(new_game(), Position::startpos());
        assert_eq!(status(&new_game()), GameStatus::Ongoing);
    }
}
