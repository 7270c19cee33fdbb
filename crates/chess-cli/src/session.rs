//! Text commands driving a single game.

use chess_rules::movegen::perft::perft_divide;
use chess_rules::{
    move_to_san, Color, Game, GameError, GameStatus, Position, PositionError, Rank, Square,
};
use std::fmt::Write as _;
use thiserror::Error;

/// Deepest perft the front end will run.
const MAX_PERFT_DEPTH: u32 = 6;

/// Errors from reading or running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error("not a square: {0}")]
    InvalidSquare(String),

    #[error("perft depth must be between 1 and 6, got {0}")]
    InvalidDepth(String),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Position(#[from] PositionError),
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Board,
    Fen,
    Load(String),
    New,
    Moves(Option<Square>),
    Move(String),
    Status,
    History,
    Resign,
    Perft(u32),
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Returns `Ok(None)` for a blank line.
    ///
    /// Anything that is not a command word is taken as a move.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "board" | "b" => Command::Board,
            "fen" => Command::Fen,
            "load" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("load"));
                }
                Command::Load(rest.to_string())
            }
            "new" | "restart" => Command::New,
            "moves" | "m" => {
                if rest.is_empty() {
                    Command::Moves(None)
                } else {
                    let sq = Square::from_algebraic(&rest.to_ascii_lowercase())
                        .ok_or_else(|| CommandError::InvalidSquare(rest.to_string()))?;
                    Command::Moves(Some(sq))
                }
            }
            "move" | "mv" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("move"));
                }
                Command::Move(rest.to_string())
            }
            "status" => Command::Status,
            "history" | "h" => Command::History,
            "resign" => Command::Resign,
            "perft" => {
                let depth = rest
                    .parse::<u32>()
                    .ok()
                    .filter(|d| (1..=MAX_PERFT_DEPTH).contains(d))
                    .ok_or_else(|| CommandError::InvalidDepth(rest.to_string()))?;
                Command::Perft(depth)
            }
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Move(line.to_string()),
        };
        Ok(Some(command))
    }
}

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// How the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub unicode: bool,
    pub coordinates: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            unicode: false,
            coordinates: true,
        }
    }
}

/// One interactive game plus the position `new` restarts from.
pub struct Session {
    game: Game,
    start: Position,
    render: RenderOptions,
}

impl Session {
    pub fn new(start: Position, render: RenderOptions) -> Self {
        Session {
            game: Game::from_position(start.clone()),
            start,
            render,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs a command. On error the game is left as it was.
    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let text = match command {
            Command::Board => self.board_text(),
            Command::Fen => self.game.to_fen(),
            Command::Load(fen) => {
                self.game = Game::from_fen(&fen)?;
                self.board_text()
            }
            Command::New => {
                self.game = Game::from_position(self.start.clone());
                self.board_text()
            }
            Command::Moves(Some(sq)) => {
                let moves = self.game.legal_moves(sq);
                let targets: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
                if targets.is_empty() {
                    format!("no legal moves from {sq}")
                } else {
                    targets.join(" ")
                }
            }
            Command::Moves(None) => {
                let position = self.game.position();
                let sans: Vec<String> = self
                    .game
                    .legal_moves_all()
                    .iter()
                    .map(|&m| move_to_san(position, m))
                    .collect();
                if sans.is_empty() {
                    "no legal moves".to_string()
                } else {
                    sans.join(" ")
                }
            }
            Command::Move(text) => {
                self.game.play(&text)?;
                self.board_text()
            }
            Command::Status => self.status_text(),
            Command::History => self.history_text(),
            Command::Resign => {
                self.game.resign()?;
                self.status_text()
            }
            Command::Perft(depth) => perft_text(self.game.position(), depth),
            Command::Help => HELP.trim_end().to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn status_text(&self) -> String {
        match self.game.status() {
            GameStatus::Ongoing => format!("{} to move", self.game.side_to_move()),
            status => status.to_string(),
        }
    }

    fn board_text(&self) -> String {
        format!(
            "{}\n{}",
            render_board(self.game.position(), self.render),
            self.status_text()
        )
    }

    fn history_text(&self) -> String {
        let start = self.game.start_position();
        let mut number = start.fullmove_number();
        let mut side = start.side_to_move();
        let mut out = String::new();

        for (i, played) in self.game.moves().iter().enumerate() {
            match side {
                Color::White => {
                    if i > 0 {
                        out.push('\n');
                    }
                    let _ = write!(out, "{number}. {}", played.san);
                }
                Color::Black => {
                    if i == 0 {
                        let _ = write!(out, "{number}... {}", played.san);
                    } else {
                        let _ = write!(out, " {}", played.san);
                    }
                    number += 1;
                }
            }
            side = side.opposite();
        }

        if out.is_empty() {
            out.push_str("no moves played");
        }
        out
    }
}

/// Draws the board, rank 8 at the top.
pub fn render_board(position: &Position, options: RenderOptions) -> String {
    let mut out = String::new();
    for rank in Rank::ALL.iter().rev() {
        if options.coordinates {
            let _ = write!(out, "{} ", rank.to_char());
        }
        for (i, sq) in Square::all().filter(|sq| sq.rank() == *rank).enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let c = match position.piece_at(sq) {
                Some(piece) if options.unicode => piece.glyph(),
                Some(piece) => piece.to_fen_char(),
                None => '.',
            };
            out.push(c);
        }
        out.push('\n');
    }
    if options.coordinates {
        out.push_str("  a b c d e f g h\n");
    }
    out.pop();
    out
}

fn perft_text(position: &Position, depth: u32) -> String {
    let divide = perft_divide(position, depth);
    let total: u64 = divide.iter().map(|(_, n)| n).sum();
    let mut out = String::new();
    for (uci, nodes) in &divide {
        let _ = writeln!(out, "{uci}: {nodes}");
    }
    let _ = write!(out, "total: {total}");
    out
}

const HELP: &str = "\
commands:
  board            show the board
  fen              print the position as FEN
  load <fen>       start a game from a FEN position
  new              restart from the starting position
  moves [square]   list legal moves, or those of one piece
  move <move>      play a move (e2e4, e7e8n, Nf3, O-O); `move` may be omitted
  status           show whose turn it is or how the game ended
  history          list the moves played
  resign           resign for the side to move
  perft <depth>    count leaf nodes of the move tree
  help             show this text
  quit             leave
";
