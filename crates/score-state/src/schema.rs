//! Row types for the `players` table
//!
//! `PlayerRow` is what SurrealDB returns; `NewPlayerRow` is the content
//! bound into `CREATE`. Both convert to/from the public `PlayerScore` at the
//! storage boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime as SurrealDatetime, Thing};

use crate::error::StorageError;
use crate::storage_traits::{PlayerId, PlayerScore};

/// Table holding one row per player
pub const PLAYERS_TABLE: &str = "players";

/// A row as stored in SurrealDB.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRow {
    pub id: Thing,
    pub name: String,
    pub score: i64,
    pub created_at: SurrealDatetime,
}

impl PlayerRow {
    pub fn into_player_score(self) -> Result<PlayerScore, StorageError> {
        if self.id.tb != PLAYERS_TABLE {
            return Err(StorageError::Corrupt(format!(
                "record {} does not belong to {}",
                self.id, PLAYERS_TABLE
            )));
        }
        if self.name.is_empty() {
            return Err(StorageError::Corrupt(format!(
                "record {} has an empty name",
                self.id
            )));
        }
        Ok(PlayerScore {
            id: PlayerId::new(self.id.id.to_raw()),
            name: self.name,
            score: self.score,
            created_at: DateTime::<Utc>::from(self.created_at),
        })
    }
}

/// Content of a freshly created row. The record id is assigned by the
/// database (`players:ulid()`), so it is not part of the content.
#[derive(Debug, Clone, Serialize)]
pub struct NewPlayerRow {
    pub name: String,
    pub score: i64,
    pub created_at: SurrealDatetime,
}

impl NewPlayerRow {
    pub fn new(name: &str, score: i64) -> Self {
        Self {
            name: name.to_string(),
            score,
            created_at: SurrealDatetime::from(Utc::now()),
        }
    }
}
