//! In-memory fakes for storage traits (testing only)
//!
//! Provides `MemoryScoreStore`, which satisfies the `ScoreReader` and
//! `ScoreWriter` contracts without any external dependencies.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StorageError;
use crate::storage_traits::*;

#[derive(Debug, Default)]
struct Table {
    /// Rows in creation order.
    rows: Vec<PlayerScore>,
    /// name -> index into `rows`; plays the role of the unique index.
    by_name: HashMap<String, usize>,
    next_id: u64,
}

/// In-memory score table backed by a `Vec` plus a unique name index.
///
/// The lock is held for exactly one primitive and never across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    table: Mutex<Table>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every row in creation order.
    pub fn rows(&self) -> Vec<PlayerScore> {
        self.table.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl ScoreReader for MemoryScoreStore {
    async fn find_by_name(&self, name: &str) -> StorageResult<Option<PlayerScore>> {
        let table = self.table.lock().unwrap();
        Ok(table.by_name.get(name).map(|&idx| table.rows[idx].clone()))
    }

    async fn top(&self, limit: usize) -> StorageResult<Vec<PlayerScore>> {
        let table = self.table.lock().unwrap();
        let mut ranked = table.rows.clone();
        // Stable sort keeps creation order among equal scores.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limit);
        Ok(ranked)
    }
}

#[async_trait]
impl ScoreWriter for MemoryScoreStore {
    async fn insert(&self, name: &str, score: i64) -> StorageResult<PlayerScore> {
        let mut table = self.table.lock().unwrap();
        if table.by_name.contains_key(name) {
            return Err(StorageError::DuplicateName {
                name: name.to_string(),
            });
        }
        table.next_id += 1;
        let record = PlayerScore {
            id: PlayerId::new(format!("{:020}", table.next_id)),
            name: name.to_string(),
            score,
            created_at: Utc::now(),
        };
        let idx = table.rows.len();
        table.rows.push(record.clone());
        table.by_name.insert(name.to_string(), idx);
        Ok(record)
    }

    async fn update_score(&self, name: &str, score: i64) -> StorageResult<Option<PlayerScore>> {
        let mut table = self.table.lock().unwrap();
        let Some(&idx) = table.by_name.get(name) else {
            return Ok(None);
        };
        let row = &mut table.rows[idx];
        row.score = score;
        Ok(Some(row.clone()))
    }
}
