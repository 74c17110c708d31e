//! Score persistence and the leaderboard shown next to the board.

mod error;
mod memory_store;
mod models;
mod repository;
mod schema;
mod service;
mod store;

pub use error::LeaderboardError;
pub use memory_store::MemoryScoreStore;
pub use models::{MAX_NAME_LEN, NewScore, PlayerName, ScoreEntry};
pub use repository::ScoreRepository;
pub use service::{LeaderboardService, LeaderboardState, RETRY_MESSAGE, SubmitStatus};
pub use store::ScoreStore;
