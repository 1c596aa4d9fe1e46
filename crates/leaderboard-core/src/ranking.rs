//! Ranking Query: bounded, ordered, read-only view of the scores.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use score_state::{PlayerScore, ScoreReader};
use tracing::instrument;

use crate::deadline::{Deadline, DEFAULT_OP_TIMEOUT};
use crate::error::LeaderboardError;
use crate::obs;
use crate::validation::resolve_top_k;
use crate::Result;

/// Serves top-K windows. Holds a reader only, so it cannot write.
#[derive(Clone)]
pub struct RankingQuery {
    reader: Arc<dyn ScoreReader>,
    deadline: Deadline,
}

impl RankingQuery {
    pub fn new(reader: Arc<dyn ScoreReader>) -> Self {
        Self::with_timeout(reader, DEFAULT_OP_TIMEOUT)
    }

    pub fn with_timeout(reader: Arc<dyn ScoreReader>, op_timeout: Duration) -> Self {
        Self {
            reader,
            deadline: Deadline::new(op_timeout),
        }
    }

    /// Up to `k` players by score, highest first. `None` means
    /// [`crate::DEFAULT_TOP_K`].
    #[instrument(skip(self))]
    pub async fn top_k(&self, k: Option<usize>) -> Result<Vec<PlayerScore>> {
        let k = resolve_top_k(k).inspect_err(|e| obs::emit_request_rejected(e))?;

        let players = self.deadline.run("top", self.reader.top(k)).await??;
        check_window(&players, k)?;

        obs::emit_ranking_served(k, players.len());
        Ok(players)
    }
}

/// Reject a backend answer that breaks the window contract.
fn check_window(players: &[PlayerScore], k: usize) -> Result<()> {
    if players.len() > k {
        return Err(LeaderboardError::StoreUnavailable(format!(
            "backend returned {} rows for a window of {}",
            players.len(),
            k
        )));
    }
    if players.windows(2).any(|w| w[0].score < w[1].score) {
        return Err(LeaderboardError::StoreUnavailable(
            "backend returned rows out of score order".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(players.len());
    if let Some(dup) = players.iter().find(|p| !seen.insert(p.name.as_str())) {
        return Err(LeaderboardError::StoreUnavailable(format!(
            "backend returned {:?} twice",
            dup.name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use score_state::PlayerId;

    fn player(id: u64, name: &str, score: i64) -> PlayerScore {
        PlayerScore {
            id: PlayerId::new(id.to_string()),
            name: name.to_string(),
            score,
            created_at: Default::default(),
        }
    }

    #[test]
    fn test_check_window_accepts_well_formed_rows() {
        let rows = vec![player(2, "b", 9), player(3, "c", 5), player(1, "a", 5)];
        assert!(check_window(&rows, 3).is_ok());
        assert!(check_window(&[], 10).is_ok());
    }

    #[test]
    fn test_check_window_rejects_overflow() {
        let rows = vec![player(1, "a", 3), player(2, "b", 2)];
        assert!(check_window(&rows, 1).is_err());
    }

    #[test]
    fn test_check_window_rejects_unsorted_rows() {
        let rows = vec![player(1, "a", 3), player(2, "b", 9)];
        assert!(check_window(&rows, 2).is_err());
    }

    #[test]
    fn test_check_window_rejects_repeated_names() {
        let rows = vec![player(1, "a", 3), player(1, "a", 3)];
        let err = check_window(&rows, 2).unwrap_err();
        assert!(err.to_string().contains("twice"));
    }
}
