//! Game sessions with move log and repetition tracking.
//!
//! A [`Game`] owns the current [`Position`] of one game and is the only
//! place it changes. Besides what a single position can tell, it tracks:
//! - the move log in SAN
//! - position keys for threefold repetition
//! - forfeits reported by outside collaborators such as a clock

use crate::movegen::legal_moves_all;
use crate::notation::{move_to_san, parse_coordinate, parse_move, san_to_move};
use crate::position::PositionError;
use crate::rules::{DrawReason, ForfeitReason, GameError, GameStatus, RuleSet, StandardChess};
use crate::{Board, MoveList, Position};
use chess_core::{CastlingRights, Color, Move, Square};
use tracing::{info, warn};

/// A recorded move in the game log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMove {
    /// The move as played.
    pub mov: Move,
    /// SAN for the move, relative to the position it was played in.
    pub san: String,
}

/// The parts of a position that decide whether it repeats.
///
/// The en passant target only counts when a capture on it is actually
/// legal; the move counters never count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RepetitionKey {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
}

impl RepetitionKey {
    fn of(position: &Position) -> Self {
        let en_passant = position.en_passant().filter(|_| {
            legal_moves_all(position)
                .iter()
                .any(|m| m.is_en_passant())
        });
        RepetitionKey {
            board: position.board().clone(),
            side_to_move: position.side_to_move(),
            castling: position.castling(),
            en_passant,
        }
    }
}

/// One game of chess from its starting position to its result.
///
/// # Example
///
/// ```
/// use chess_rules::{Color, Game, GameStatus};
///
/// let mut game = Game::new();
/// for mv in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
///     game.play(mv).unwrap();
/// }
/// assert_eq!(game.status(), GameStatus::Checkmate { winner: Color::White });
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    start_position: Position,
    moves: Vec<GameMove>,
    history: Vec<RepetitionKey>,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    /// Creates a game from any valid position.
    ///
    /// The position is classified immediately, so a game may start out
    /// already finished.
    pub fn from_position(position: Position) -> Self {
        let status = StandardChess.status(&position);
        Game {
            history: vec![RepetitionKey::of(&position)],
            start_position: position.clone(),
            position,
            moves: Vec::new(),
            status,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    /// Returns the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the position the game started from.
    pub fn start_position(&self) -> &Position {
        &self.start_position
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game has a result.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the side whose turn it is.
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    /// Returns the move log.
    pub fn moves(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the legal moves of the piece on `from`, or nothing once the
    /// game is over.
    pub fn legal_moves(&self, from: Square) -> MoveList {
        if self.is_over() {
            return MoveList::new();
        }
        StandardChess.legal_moves(&self.position, from)
    }

    /// Returns every legal move, or nothing once the game is over.
    pub fn legal_moves_all(&self) -> MoveList {
        if self.is_over() {
            return MoveList::new();
        }
        StandardChess.legal_moves_all(&self.position)
    }

    /// Counts how often the current position has occurred in this game.
    pub fn position_count(&self) -> usize {
        match self.history.last() {
            Some(current) => self.history.iter().filter(|&k| k == current).count(),
            None => 0,
        }
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Plays a move and returns the new status.
    ///
    /// On error the game is left exactly as it was.
    pub fn make_move(&mut self, m: Move) -> Result<GameStatus, GameError> {
        if self.is_over() {
            warn!(mv = %m, status = %self.status, "move after end of game");
            return Err(GameError::GameOver(self.status));
        }

        let next = StandardChess
            .apply_move(&self.position, m)
            .inspect_err(|err| warn!(mv = %m, %err, "move rejected"))?;

        let san = move_to_san(&self.position, m);
        self.moves.push(GameMove { mov: m, san });
        self.history.push(RepetitionKey::of(&next));
        self.position = next;

        self.status = StandardChess.status(&self.position);
        if !self.status.is_terminal() && self.position_count() >= 3 {
            self.status = GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        if self.status.is_terminal() {
            info!(status = %self.status, plies = self.moves.len(), "game over");
        }
        Ok(self.status)
    }

    /// Plays a move given in coordinate notation.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<GameStatus, GameError> {
        self.ensure_ongoing()?;
        let m = parse_coordinate(&self.position, uci)?;
        self.make_move(m)
    }

    /// Plays a move given in SAN.
    pub fn make_move_san(&mut self, san: &str) -> Result<GameStatus, GameError> {
        self.ensure_ongoing()?;
        let m = san_to_move(&self.position, san)?;
        self.make_move(m)
    }

    /// Plays a move given in either coordinate notation or SAN.
    pub fn play(&mut self, text: &str) -> Result<GameStatus, GameError> {
        self.ensure_ongoing()?;
        let m = parse_move(&self.position, text)
            .inspect_err(|err| warn!(text, %err, "unreadable move"))?;
        self.make_move(m)
    }

    /// Ends the game in favour of `loser`'s opponent.
    ///
    /// Used by collaborators that sit outside the rules, such as a clock
    /// reporting a flag fall, or a player resigning.
    pub fn forfeit(
        &mut self,
        loser: Color,
        reason: ForfeitReason,
    ) -> Result<GameStatus, GameError> {
        self.ensure_ongoing()?;
        self.status = GameStatus::Forfeit {
            winner: loser.opposite(),
            reason,
        };
        info!(status = %self.status, "game over");
        Ok(self.status)
    }

    /// Resigns on behalf of the side to move.
    pub fn resign(&mut self) -> Result<GameStatus, GameError> {
        self.forfeit(self.side_to_move(), ForfeitReason::Resignation)
    }

    fn ensure_ongoing(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver(self.status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::NotationError;

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert!(!game.is_over());
        assert_eq!(game.status(), GameStatus::Ongoing);
        assert_eq!(game.legal_moves_all().len(), 20);
        assert_eq!(game.start_position(), game.position());
    }

    #[test]
    fn moves_are_logged_in_san() {
        let mut game = Game::new();
        game.make_move_uci("e2e4").unwrap();
        game.make_move_san("e5").unwrap();
        game.play("g1f3").unwrap();
        game.play("Nc6").unwrap();

        let sans: Vec<&str> = game.moves().iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, ["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(game.position().fullmove_number(), 3);
    }

    #[test]
    fn rejected_moves_leave_the_game_unchanged() {
        let mut game = Game::new();
        let fen = game.to_fen();

        assert!(matches!(
            game.make_move_uci("e2e5"),
            Err(GameError::InvalidNotation(NotationError::NoMatchingMove(_)))
        ));
        let m = Move::normal(Square::E1, Square::E8);
        assert_eq!(game.make_move(m), Err(GameError::IllegalMove(m)));
        assert!(game.play("").is_err());

        assert_eq!(game.to_fen(), fen);
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new();
        for mv in ["f3", "e5", "g4"] {
            game.play(mv).unwrap();
        }
        let status = game.play("Qh4").unwrap();
        assert_eq!(
            status,
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
        assert_eq!(game.moves()[3].san, "Qh4#");
        assert!(game.legal_moves_all().is_empty());
        assert!(matches!(game.play("a3"), Err(GameError::GameOver(_))));
    }

    #[test]
    fn stalemate_at_start() {
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(game.is_over());
        assert_eq!(game.status(), GameStatus::Stalemate);
    }

    #[test]
    fn threefold_repetition_ends_the_game() {
        let mut game = Game::new();
        for mv in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.play(mv).unwrap();
        }
        assert_eq!(game.position_count(), 2);
        assert!(!game.is_over());

        for mv in ["Nf3", "Nf6", "Ng1"] {
            game.play(mv).unwrap();
        }
        let status = game.play("Ng8").unwrap();
        assert_eq!(game.position_count(), 3);
        assert_eq!(status, GameStatus::Draw(DrawReason::ThreefoldRepetition));
        assert!(matches!(game.play("e4"), Err(GameError::GameOver(_))));
    }

    #[test]
    fn unusable_en_passant_target_does_not_break_repetition() {
        // Nothing can capture on e3 after 1.e4, so the position after
        // 3.Ng1 repeats the one after 1.e4
        let mut game = Game::new();
        for mv in ["e4", "Nf6", "Nf3", "Ng8", "Ng1"] {
            game.play(mv).unwrap();
        }
        assert_eq!(game.position_count(), 2);
    }

    #[test]
    fn insufficient_material() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert_eq!(
            game.status(),
            GameStatus::Draw(DrawReason::InsufficientMaterial)
        );
    }

    #[test]
    fn forfeit_on_time() {
        let mut game = Game::new();
        game.play("e4").unwrap();
        let status = game.forfeit(Color::Black, ForfeitReason::Timeout).unwrap();
        assert_eq!(
            status,
            GameStatus::Forfeit {
                winner: Color::White,
                reason: ForfeitReason::Timeout
            }
        );
        assert!(game.legal_moves(Square::from_algebraic("e7").unwrap()).is_empty());
        assert!(matches!(
            game.forfeit(Color::White, ForfeitReason::Resignation),
            Err(GameError::GameOver(_))
        ));
    }

    #[test]
    fn resign() {
        let mut game = Game::new();
        assert_eq!(game.resign().unwrap().winner(), Some(Color::Black));
        assert!(matches!(game.play("e4"), Err(GameError::GameOver(_))));
    }
}
