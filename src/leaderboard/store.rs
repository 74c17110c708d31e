//! The seam between the game and wherever scores are kept.

use crate::leaderboard::{LeaderboardError, NewScore, ScoreEntry};

/// Leaderboard storage consumed by the game.
///
/// Implementations order entries by score, highest first; ties go to the
/// earlier submission.
pub trait ScoreStore: Send + Sync {
    /// Returns at most `k` entries, best first.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the store cannot be read.
    fn fetch_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    /// Stores a final score.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the store cannot be written.
    fn submit_score(&self, score: NewScore) -> Result<ScoreEntry, LeaderboardError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn fetch_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        (**self).fetch_top(k)
    }

    fn submit_score(&self, score: NewScore) -> Result<ScoreEntry, LeaderboardError> {
        (**self).submit_score(score)
    }
}

impl<T: ScoreStore + ?Sized> ScoreStore for std::sync::Arc<T> {
    fn fetch_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        (**self).fetch_top(k)
    }

    fn submit_score(&self, score: NewScore) -> Result<ScoreEntry, LeaderboardError> {
        (**self).submit_score(score)
    }
}
