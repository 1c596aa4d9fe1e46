//! SurrealDB schema initialization
//!
//! Sets up the `players` table with its constraints and indexes.

use crate::error::StateError;
use crate::Result;
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

/// Initialize all leaderboard tables in SurrealDB
///
/// Safe to call multiple times (idempotent).
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing leaderboard schema");

    init_players_table(db).await?;

    info!("Leaderboard schema initialization complete");
    Ok(())
}

/// Initialize `players` table with constraints and indexes
///
/// Schema:
/// ```text
/// TABLE players {
///   id:          RECORD (players:<ulid>, assigned at creation)
///   name:        STRING (unique, non-empty)
///   score:       INT    (default 0)
///   created_at:  DATETIME
/// }
/// ```
///
/// Constraints:
/// - `name` is unique; concurrent creators for one name cannot both succeed
/// - rows are never deleted
async fn init_players_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing players table");

    let sql = r#"
        DEFINE TABLE IF NOT EXISTS players SCHEMAFULL
            PERMISSIONS
                FOR select FULL
                FOR create FULL
                FOR update FULL
                FOR delete NONE;

        DEFINE FIELD IF NOT EXISTS name ON players TYPE string
            ASSERT string::len($value) > 0;
        DEFINE FIELD IF NOT EXISTS score ON players TYPE int DEFAULT 0;
        DEFINE FIELD IF NOT EXISTS created_at ON players TYPE datetime;

        -- The authoritative guard against duplicate players
        DEFINE INDEX IF NOT EXISTS idx_player_name ON players FIELDS name UNIQUE;

        -- Ranking reads
        DEFINE INDEX IF NOT EXISTS idx_player_score ON players FIELDS score;
    "#;

    db.query(sql)
        .await
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?
        .check()
        .map_err(|e| StateError::SchemaSetup(e.to_string()))?;

    info!("✓ players table initialized");
    Ok(())
}
