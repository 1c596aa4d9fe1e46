//! SurrealDB-backed ScoreReader / ScoreWriter implementation
//!
//! Uses `schema::PlayerRow` for persistence, converting to `PlayerScore`
//! at the boundary.

use async_trait::async_trait;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, instrument};

use crate::error::StorageError;
use crate::handle;
use crate::schema::{NewPlayerRow, PlayerRow};
use crate::storage_traits::{PlayerScore, ScoreReader, ScoreWriter, StorageResult};

/// SurrealDB-backed implementation of [`ScoreReader`] and [`ScoreWriter`].
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct SurrealScoreStore {
    db: Surreal<Any>,
}

impl SurrealScoreStore {
    /// Wrap an existing connection. The caller is responsible for having run
    /// [`crate::migrations::init_schema`] on it.
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    /// Create an in-memory instance for testing.
    pub async fn in_memory() -> crate::Result<Self> {
        Ok(Self::new(handle::connect_memory().await?))
    }

    /// Create from environment variables.
    ///
    /// Uses the env-var chain of [`handle::connect_from_env`].
    pub async fn from_env() -> crate::Result<Self> {
        Ok(Self::new(handle::connect_from_env().await?))
    }

    fn rows_into_scores(rows: Vec<PlayerRow>) -> StorageResult<Vec<PlayerScore>> {
        rows.into_iter().map(PlayerRow::into_player_score).collect()
    }
}

#[async_trait]
impl ScoreReader for SurrealScoreStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<PlayerScore>> {
        let name_owned = name.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM players WHERE name = $name")
            .bind(("name", name_owned))
            .await?;

        let rows: Vec<PlayerRow> = result.take(0)?;
        rows.into_iter()
            .next()
            .map(PlayerRow::into_player_score)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: usize) -> StorageResult<Vec<PlayerScore>> {
        let limit = i64::try_from(limit)
            .map_err(|_| StorageError::Backend(format!("limit {} out of range", limit)))?;

        let mut result = self
            .db
            .query(
                "SELECT * FROM players ORDER BY score DESC, created_at ASC, name ASC LIMIT $limit",
            )
            .bind(("limit", limit))
            .await?;

        let rows: Vec<PlayerRow> = result.take(0)?;
        debug!(rows = rows.len(), "ranking rows fetched");
        Self::rows_into_scores(rows)
    }
}

#[async_trait]
impl ScoreWriter for SurrealScoreStore {
    #[instrument(skip(self))]
    async fn insert(&self, name: &str, score: i64) -> StorageResult<PlayerScore> {
        let record = NewPlayerRow::new(name, score);

        let mut result = self
            .db
            .query("CREATE players:ulid() CONTENT $record")
            .bind(("record", record))
            .await
            .map_err(|e| StorageError::from_insert(name, e))?;

        let created: Vec<PlayerRow> = result
            .take(0)
            .map_err(|e| StorageError::from_insert(name, e))?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Backend("failed to create player record".to_string()))?
            .into_player_score()
    }

    #[instrument(skip(self))]
    async fn update_score(&self, name: &str, score: i64) -> StorageResult<Option<PlayerScore>> {
        let name_owned = name.to_string();

        let mut result = self
            .db
            .query("UPDATE players SET score = $score WHERE name = $name RETURN AFTER")
            .bind(("score", score))
            .bind(("name", name_owned))
            .await?;

        let updated: Vec<PlayerRow> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .map(PlayerRow::into_player_score)
            .transpose()
    }
}
