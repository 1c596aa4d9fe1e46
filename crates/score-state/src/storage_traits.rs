//! Storage trait definitions for the leaderboard
//!
//! The `players` table is exposed through two traits:
//! - `ScoreReader`: lookups and the ordered top-N read
//! - `ScoreWriter`: the two write primitives (insert, update in place)
//!
//! Readers never get write access: anything that only ranks is handed an
//! `Arc<dyn ScoreReader>`. In-memory fakes live in the `fakes` module.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Opaque surrogate identifier assigned by the backend at creation.
///
/// Identifiers are time-ordered within a backend and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: impl Into<String>) -> Self {
        PlayerId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single leaderboard row.
///
/// Serializes to the wire shape `{"id", "userName", "score"}`; `created_at`
/// is bookkeeping for tie-breaks and stays out of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub id: PlayerId,
    #[serde(rename = "userName")]
    pub name: String,
    pub score: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Read access to the `players` table.
///
/// Guarantees:
/// - `find_by_name` matches names exactly (case-sensitive).
/// - `top(limit)` returns at most `limit` rows ordered by `score` descending,
///   ties broken by creation order. Repeated calls on unchanged data return
///   the same sequence.
#[async_trait]
pub trait ScoreReader: Send + Sync {
    /// Look up a player by exact name.
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<PlayerScore>>;

    /// Return the highest scores, best first.
    async fn top(&self, limit: usize) -> StorageResult<Vec<PlayerScore>>;
}

/// Write access to the `players` table.
///
/// Each method is a single atomic storage statement: a caller that is
/// cancelled mid-call observes either no effect or the full effect.
#[async_trait]
pub trait ScoreWriter: ScoreReader {
    /// Create a record. Fails with `StorageError::DuplicateName` when the
    /// unique index on `name` already holds this name.
    async fn insert(&self, name: &str, score: i64) -> StorageResult<PlayerScore>;

    /// Replace the score of an existing record. Returns `Ok(None)` when no
    /// record carries this name.
    async fn update_score(&self, name: &str, score: i64) -> StorageResult<Option<PlayerScore>>;
}
