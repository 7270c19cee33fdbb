//! Chess CLI - play a game of chess in the terminal.
//!
//! Reads commands from standard input, one per line, and prints the board
//! after every move. Type `help` for the command list.

mod config;
mod session;

use anyhow::Context;
use clap::Parser;
use config::CliConfig;
use session::{Command, RenderOptions, Reply, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Chess CLI - play chess in the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play chess in the terminal")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value_os_t = CliConfig::default_path())]
    config: PathBuf,

    /// Start from this FEN instead of the configured position
    #[arg(long)]
    fen: Option<String>,

    /// Log filter directive, e.g. "debug" or "chess_rules=trace"
    #[arg(long)]
    log_level: Option<String>,

    /// Draw pieces with Unicode glyphs
    #[arg(long)]
    unicode: bool,

    /// Hide file and rank labels
    #[arg(long)]
    no_coordinates: bool,
}

/// Picks the log filter: `--log-level`, then `RUST_LOG`, then the config.
fn log_filter(args: &Args, config: &CliConfig) -> EnvFilter {
    if let Some(directive) = &args.log_level {
        return EnvFilter::new(directive);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = CliConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.fen.is_some() {
        config.start_fen = args.fen.clone();
    }
    config.unicode |= args.unicode;
    config.show_coordinates &= !args.no_coordinates;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&args, &config))
        .with_writer(io::stderr)
        .init();

    let start = config.start_position()?;
    tracing::info!(fen = %start.to_fen(), "starting session");

    let mut session = Session::new(
        start,
        RenderOptions {
            unicode: config.unicode,
            coordinates: config.show_coordinates,
        },
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Ok(Reply::Text(board)) = session.execute(Command::Board) {
        writeln!(stdout, "{board}")?;
    }

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let reply = Command::parse(&line).and_then(|command| match command {
            Some(command) => session.execute(command).map(Some),
            None => Ok(None),
        });
        match reply {
            Ok(Some(Reply::Text(text))) => writeln!(stdout, "{text}")?,
            Ok(Some(Reply::Quit)) => break,
            Ok(None) => {}
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }

    tracing::info!(status = %session.game().status(), "session ended");
    Ok(())
}
