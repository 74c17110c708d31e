//! Game configuration loaded from TOML.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::memory::{GAP, HOLD, LEAD_IN, PlaybackTiming, ROUND_DELAY};

/// Settings for one game board and its leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells on the board.
    board_size: usize,

    /// Cells per grid row.
    columns: usize,

    /// Quiet time before the first highlight, in milliseconds.
    lead_in_ms: u64,

    /// How long each cell stays lit, in milliseconds.
    hold_ms: u64,

    /// Pause between highlights, in milliseconds.
    gap_ms: u64,

    /// Pause after a completed round, in milliseconds.
    round_delay_ms: u64,

    /// Entries shown on the leaderboard.
    leaderboard_size: usize,

    /// SQLite database file for scores.
    db_path: String,

    /// Fixed RNG seed; entropy is used when absent.
    seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 16,
            columns: 4,
            lead_in_ms: millis(LEAD_IN),
            hold_ms: millis(HOLD),
            gap_ms: millis(GAP),
            round_delay_ms: millis(ROUND_DELAY),
            leaderboard_size: 5,
            db_path: "color_rush.db".to_string(),
            seed: None,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl GameConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(board_size = config.board_size, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Checks the board dimensions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::new("board_size must be at least 1".to_string()));
        }
        if self.columns == 0 {
            return Err(ConfigError::new("columns must be at least 1".to_string()));
        }
        if self.columns > self.board_size {
            return Err(ConfigError::new(format!(
                "columns ({}) cannot exceed board_size ({})",
                self.columns, self.board_size
            )));
        }
        Ok(())
    }

    /// Playback timing in the scheduler's units.
    pub fn timing(&self) -> PlaybackTiming {
        PlaybackTiming {
            lead_in: Duration::from_millis(self.lead_in_ms),
            hold: Duration::from_millis(self.hold_ms),
            gap: Duration::from_millis(self.gap_ms),
            round_delay: Duration::from_millis(self.round_delay_ms),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_board_constants() {
        let config = GameConfig::default();
        assert_eq!(*config.board_size(), 16);
        assert_eq!(*config.columns(), 4);
        assert_eq!(config.timing(), PlaybackTiming::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "board_size = 9\ncolumns = 3\nseed = 42").expect("write config");

        let config = GameConfig::from_file(file.path()).expect("valid config");
        assert_eq!(*config.board_size(), 9);
        assert_eq!(*config.columns(), 3);
        assert_eq!(*config.seed(), Some(42));
        assert_eq!(*config.hold_ms(), 600);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = GameConfig::load_or_default(dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_dimensions() {
        assert!(GameConfig::default().with_board_size(0).validate().is_err());
        assert!(GameConfig::default().with_columns(0).validate().is_err());
        assert!(GameConfig::default().with_columns(17).validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "board_size = \"lots\"").expect("write config");
        assert!(GameConfig::from_file(file.path()).is_err());
    }
}
