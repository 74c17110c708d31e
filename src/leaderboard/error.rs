//! Leaderboard error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Leaderboard store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Leaderboard error: {} at {}:{}", message, file, line)]
pub struct LeaderboardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LeaderboardError {
    /// Creates a new leaderboard error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for LeaderboardError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for LeaderboardError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
