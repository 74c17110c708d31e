//! Leaderboard business layer used by the front ends.
//!
//! Store failures never escape as errors here: reads collapse to
//! [`LeaderboardState::Unavailable`] and writes to a retryable
//! [`SubmitStatus::Failed`]. The game session is never consulted.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::leaderboard::{NewScore, PlayerName, ScoreEntry, ScoreStore};

/// Message shown when a submission fails and may be retried.
pub const RETRY_MESSAGE: &str = "Failed to submit score. Please try again.";

/// What the leaderboard panel should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardState {
    /// A fetch is still running. Never returned by
    /// [`LeaderboardService::top`]; front ends hold it until the fetch lands.
    Loading,
    /// Entries loaded, best first.
    Loaded(Vec<ScoreEntry>),
    /// The store answered but holds no scores.
    Empty,
    /// The store could not be read.
    Unavailable {
        /// Reason for the failure.
        message: String,
    },
}

impl LeaderboardState {
    /// Loaded entries, or an empty slice for the other states.
    pub fn entries(&self) -> &[ScoreEntry] {
        match self {
            Self::Loaded(entries) => entries,
            Self::Loading | Self::Empty | Self::Unavailable { .. } => &[],
        }
    }
}

/// Outcome of a score submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// The score was stored.
    Submitted(ScoreEntry),
    /// The name did not pass validation; nothing was sent.
    Rejected {
        /// What is wrong with the name.
        message: String,
    },
    /// The store failed; the player may try again.
    Failed {
        /// Message for the player.
        message: String,
    },
}

impl SubmitStatus {
    /// Whether the score was stored.
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

/// Reads and writes scores through a [`ScoreStore`].
///
/// Clones share the store, so a clone can be moved onto a blocking task.
#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
}

impl std::fmt::Debug for LeaderboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardService").finish_non_exhaustive()
    }
}

impl LeaderboardService {
    /// Wraps a store.
    pub fn new(store: impl ScoreStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Top `k` scores.
    #[instrument(skip(self))]
    pub fn top(&self, k: usize) -> LeaderboardState {
        match self.store.fetch_top(k) {
            Ok(entries) if entries.is_empty() => LeaderboardState::Empty,
            Ok(entries) => {
                info!(count = entries.len(), "Leaderboard loaded");
                LeaderboardState::Loaded(entries)
            }
            Err(e) => {
                warn!(error = %e, "Leaderboard unavailable");
                LeaderboardState::Unavailable { message: e.message }
            }
        }
    }

    /// Validates `name` and stores `score` under it.
    #[instrument(skip(self, name))]
    pub fn submit(&self, name: &str, score: u32) -> SubmitStatus {
        let name = match PlayerName::parse(name) {
            Ok(name) => name,
            Err(e) => return SubmitStatus::Rejected { message: e.message },
        };
        let new_score = match NewScore::new(name, score) {
            Ok(new_score) => new_score,
            Err(e) => return SubmitStatus::Rejected { message: e.message },
        };

        match self.store.submit_score(new_score) {
            Ok(entry) => {
                info!(entry_id = entry.id(), "Score submitted");
                SubmitStatus::Submitted(entry)
            }
            Err(e) => {
                warn!(error = %e, "Score submission failed");
                SubmitStatus::Failed {
                    message: RETRY_MESSAGE.to_string(),
                }
            }
        }
    }
}
