//! Leaderboard models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::leaderboard::{LeaderboardError, schema};

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 20;

/// A stored leaderboard entry.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Queryable,
    Identifiable,
    Selectable,
    Getters,
    Serialize,
    Deserialize,
    new,
)]
#[diesel(table_name = schema::scores)]
pub struct ScoreEntry {
    id: i32,
    name: String,
    score: i32,
    created_at: NaiveDateTime,
}

/// Insertable entry for submitting a score.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, Getters)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    name: String,
    score: i32,
}

impl NewScore {
    /// Creates a submission from a validated name and a final score.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the score does not fit the store.
    #[instrument(skip(name), fields(name = %name.as_str()))]
    pub fn new(name: PlayerName, score: u32) -> Result<Self, LeaderboardError> {
        let score = i32::try_from(score)
            .map_err(|_| LeaderboardError::new(format!("Score {} is too large to store", score)))?;
        Ok(Self {
            name: name.into_inner(),
            score,
        })
    }
}

/// A player name that passed validation: trimmed, non-empty, at most
/// [`MAX_NAME_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates a raw name as typed by the player.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] if the trimmed name is empty or too long.
    #[instrument(skip(raw))]
    pub fn parse(raw: &str) -> Result<Self, LeaderboardError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LeaderboardError::new("Name must not be empty"));
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LEN {
            return Err(LeaderboardError::new(format!(
                "Name is {} characters, at most {} allowed",
                len, MAX_NAME_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = PlayerName::parse("  Ada  ").expect("valid name");
        assert_eq!(name.as_str(), "Ada");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(PlayerName::parse("   ").is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        assert!(PlayerName::parse(&"é".repeat(MAX_NAME_LEN)).is_ok());
        assert!(PlayerName::parse(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_new_score_rejects_overflow() {
        let name = PlayerName::parse("Ada").expect("valid name");
        assert!(NewScore::new(name, u32::MAX).is_err());
    }
}
