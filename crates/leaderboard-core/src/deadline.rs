//! Per-operation time bound for storage calls.

use std::future::Future;
use std::time::Duration;

use score_state::StorageResult;

use crate::error::LeaderboardError;
use crate::obs;
use crate::Result;

/// Default bound for a single storage round-trip.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    limit: Duration,
}

impl Deadline {
    pub(crate) fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Run one storage call under the limit.
    ///
    /// The outer `Result` reports the timeout; the inner one is the storage
    /// outcome, left for the caller to classify. Dropping the storage future
    /// on timeout is safe because every storage primitive is one statement.
    pub(crate) async fn run<T, F>(&self, op: &'static str, fut: F) -> Result<StorageResult<T>>
    where
        F: Future<Output = StorageResult<T>>,
    {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(outcome) => Ok(outcome),
            Err(_) => {
                let elapsed_ms = self.limit.as_millis() as u64;
                obs::emit_store_timeout(op, elapsed_ms);
                Err(LeaderboardError::StoreUnavailable(format!(
                    "{} timed out after {} ms",
                    op, elapsed_ms
                )))
            }
        }
    }
}
