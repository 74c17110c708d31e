//! SQLite-backed leaderboard store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::leaderboard::{LeaderboardError, NewScore, ScoreEntry, ScoreStore, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for leaderboard scores.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Opens the database at `db_path`, creating the schema if needed.
    ///
    /// Every operation opens its own connection, so `":memory:"` does not
    /// keep data between calls; use a file path.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, LeaderboardError> {
        info!(path = %db_path, "Opening ScoreRepository");
        let repository = Self { db_path };
        repository.migrate()?;
        Ok(repository)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, LeaderboardError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            LeaderboardError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })
    }

    /// Applies pending schema migrations.
    #[instrument(skip(self))]
    fn migrate(&self) -> Result<(), LeaderboardError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| LeaderboardError::new(format!("Migration failed: {}", e)))?;
        debug!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Counts every stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count(&self) -> Result<i64, LeaderboardError> {
        let mut conn = self.connection()?;
        let count = schema::scores::table.count().get_result(&mut conn)?;
        Ok(count)
    }
}

impl ScoreStore for ScoreRepository {
    #[instrument(skip(self))]
    fn fetch_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        debug!(k, "Loading top scores");
        let mut conn = self.connection()?;
        let limit = i64::try_from(k).unwrap_or(i64::MAX);

        let entries = schema::scores::table
            .order((
                schema::scores::score.desc(),
                schema::scores::created_at.asc(),
                schema::scores::id.asc(),
            ))
            .limit(limit)
            .select(ScoreEntry::as_select())
            .load(&mut conn)?;

        info!(count = entries.len(), "Top scores loaded");
        Ok(entries)
    }

    #[instrument(skip(self, score), fields(name = %score.name(), score = score.score()))]
    fn submit_score(&self, score: NewScore) -> Result<ScoreEntry, LeaderboardError> {
        debug!("Recording score");
        let mut conn = self.connection()?;

        let entry = diesel::insert_into(schema::scores::table)
            .values(&score)
            .returning(ScoreEntry::as_returning())
            .get_result(&mut conn)?;

        info!(entry_id = entry.id(), score = entry.score(), "Score recorded");
        Ok(entry)
    }
}
