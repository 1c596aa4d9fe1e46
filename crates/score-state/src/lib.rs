//! Score-State: SurrealDB Backend for the Leaderboard
//!
//! This crate is the persistence layer of the leaderboard. It owns the
//! `players` table and every I/O path to it.
//!
//! ## Key Components
//!
//! - `ScoreReader` / `ScoreWriter`: backend-agnostic storage traits
//! - `SurrealScoreStore`: SurrealDB implementation with a unique name index
//! - `fakes::MemoryScoreStore`: in-memory implementation for tests
//! - `handle`: connection setup (in-memory, URL, cloud, env-driven)

mod error;
pub mod fakes;
pub mod handle;
pub mod migrations;
mod schema;
pub mod storage_traits;
pub mod surreal_scores;

pub use error::{StateError, StorageError};
pub use handle::CloudConfig;
pub use storage_traits::{PlayerId, PlayerScore, ScoreReader, ScoreWriter, StorageResult};
pub use surreal_scores::SurrealScoreStore;

/// Result type for score-state setup operations
pub type Result<T> = std::result::Result<T, StateError>;
