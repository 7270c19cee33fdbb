//! Configuration file loading for the terminal front end.
//!
//! Settings are read from `chess-cli.toml` in the working directory unless
//! another path is given on the command line. Every field is optional.

use chess_rules::{Position, PositionError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured start position is not a valid position.
    #[error("Invalid start_fen {fen:?}: {source}")]
    InvalidStartFen {
        fen: String,
        #[source]
        source: PositionError,
    },
}

/// Front end settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Position new games start from. Defaults to the standard position.
    #[serde(default)]
    pub start_fen: Option<String>,
    /// Draw pieces with Unicode chess glyphs instead of letters.
    #[serde(default)]
    pub unicode: bool,
    /// Default tracing filter directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Print file letters and rank numbers around the board.
    #[serde(default = "default_show_coordinates")]
    pub show_coordinates: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_show_coordinates() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            start_fen: None,
            unicode: false,
            log_level: default_log_level(),
            show_coordinates: default_show_coordinates(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, and
    /// [`ConfigError::InvalidStartFen`] if the start position is rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration text and validates the start position.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)?;
        config.start_position()?;
        Ok(config)
    }

    /// Returns the path of the default configuration file.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess-cli.toml")
    }

    /// Returns the position new games start from.
    pub fn start_position(&self) -> Result<Position, ConfigError> {
        match &self.start_fen {
            Some(fen) => Position::from_fen(fen).map_err(|source| ConfigError::InvalidStartFen {
                fen: fen.clone(),
                source,
            }),
            None => Ok(Position::startpos()),
        }
    }
}
