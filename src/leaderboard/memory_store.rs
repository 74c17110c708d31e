//! In-process leaderboard store, for tests and runs without a database.

use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::leaderboard::{LeaderboardError, NewScore, ScoreEntry, ScoreStore};

#[derive(Debug, Default)]
struct Entries {
    rows: Vec<ScoreEntry>,
    next_id: i32,
}

/// Leaderboard kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    entries: Mutex<Entries>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Entries>, LeaderboardError> {
        self.entries
            .lock()
            .map_err(|_| LeaderboardError::new("Score store lock poisoned"))
    }
}

impl ScoreStore for MemoryScoreStore {
    #[instrument(skip(self))]
    fn fetch_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let entries = self.lock()?;
        let mut rows = entries.rows.clone();
        rows.sort_by(|a, b| {
            b.score()
                .cmp(a.score())
                .then_with(|| a.created_at().cmp(b.created_at()))
                .then_with(|| a.id().cmp(b.id()))
        });
        rows.truncate(k);
        debug!(count = rows.len(), "Top scores loaded");
        Ok(rows)
    }

    #[instrument(skip(self, score), fields(name = %score.name(), score = score.score()))]
    fn submit_score(&self, score: NewScore) -> Result<ScoreEntry, LeaderboardError> {
        let mut entries = self.lock()?;
        entries.next_id += 1;
        let entry = ScoreEntry::new(
            entries.next_id,
            score.name().clone(),
            *score.score(),
            Utc::now().naive_utc(),
        );
        entries.rows.push(entry.clone());
        debug!(entry_id = entry.id(), "Score recorded");
        Ok(entry)
    }
}
