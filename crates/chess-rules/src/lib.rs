//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - mailbox of 64 squares with pure move simulation
//! - [`Position`] - full game state: board, side to move, castling rights,
//!   en passant target and move counters
//! - [`movegen`] - pseudo-legal generation, attack maps and the legality
//!   filter
//! - [`RuleSet`] / [`StandardChess`] - move application and status
//! - [`Game`] - a session with move log, repetition and forfeits
//! - [`notation`] - coordinate notation and SAN
//!
//! # Architecture
//!
//! Sliding pieces are generated by walking rays until the first blocker.
//! A move is legal when its simulated result leaves the mover's king
//! unattacked; castling additionally checks the squares the king crosses.
//! Positions are immutable values and every transition returns a new one.
//!
//! # Example
//!
//! ```
//! use chess_rules::{apply_move, legal_moves, new_game, status, Game, GameStatus, Square};
//!
//! // Stateless use
//! let position = new_game();
//! let moves = legal_moves(&position, Square::G1);
//! assert_eq!(moves.len(), 2);
//! let next = apply_move(&position, moves[0]).unwrap();
//! assert_eq!(status(&next), GameStatus::Ongoing);
//!
//! // A session with history
//! let mut game = Game::new();
//! game.play("e4").unwrap();
//! game.play("e7e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod board;
mod game;
pub mod movegen;
pub mod notation;
mod position;
pub mod rules;
mod square_set;

pub use board::Board;
pub use chess_core::{
    CastleSide, CastlingRights, Color, File, Move, MoveFlag, Piece, PieceKind, Rank, Square,
};
pub use game::{Game, GameMove};
pub use movegen::{
    attacked_squares, is_king_attacked, is_square_attacked, legal_moves, legal_moves_all,
    pseudo_legal_moves, MoveList,
};
pub use notation::{move_to_san, parse_move, san_to_move, NotationError};
pub use position::{Position, PositionError, MAX_LEGAL_MOVES};
pub use rules::{
    apply_move, new_game, status, DrawReason, ForfeitReason, GameError, GameStatus, RuleSet,
    StandardChess,
};
pub use square_set::SquareSet;
