//! Leaderboard Core
//!
//! Domain layer over `score-state`:
//!
//! - [`ScoreStore`]: validated, race-safe create-or-update of a player's score
//! - [`RankingQuery`]: bounded top-K read, highest score first
//!
//! Both take their storage handle at construction. Every failure is reported
//! as a [`LeaderboardError`]; nothing is logged and swallowed.

mod deadline;
pub mod error;
pub mod obs;
pub mod ranking;
pub mod score_store;
pub mod telemetry;
pub mod validation;

pub use deadline::DEFAULT_OP_TIMEOUT;
pub use error::{ErrorKind, LeaderboardError};
pub use ranking::RankingQuery;
pub use score_store::{ScoreStore, StoreOptions, MAX_CONTENTION_RETRIES, MAX_UPSERT_ATTEMPTS};
pub use telemetry::init_tracing;
pub use validation::{ScoreSubmission, DEFAULT_TOP_K, MAX_NAME_LEN, MAX_TOP_K};

pub use score_state::{PlayerId, PlayerScore};

/// Result type for leaderboard operations
pub type Result<T> = std::result::Result<T, LeaderboardError>;
