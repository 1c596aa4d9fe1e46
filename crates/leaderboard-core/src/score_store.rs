//! Score Store: validated create-or-update of one score per player.
//!
//! The storage layer only offers `find`, `insert` and `update`. Composing
//! them is a check-then-act sequence, so a concurrent creator for the same
//! name can slip in between the lookup and the insert. The unique index on
//! `name` turns that into a `DuplicateName` error, which this module treats
//! as "re-read and try again" for a bounded number of attempts.
//!
//! Engine transaction conflicts (`WriteConflict`) are a separate matter:
//! two writers touched the same row and one was aborted. Nothing was
//! written, so the round is re-run under its own, larger budget.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use score_state::{PlayerScore, ScoreWriter, StorageError};
use tracing::{debug, instrument};

use crate::deadline::{Deadline, DEFAULT_OP_TIMEOUT};
use crate::error::LeaderboardError;
use crate::obs;
use crate::validation::{validate_name, ScoreSubmission};
use crate::Result;

/// Uniqueness races tolerated before an upsert reports `Conflict`.
pub const MAX_UPSERT_ATTEMPTS: u32 = 3;

/// Engine write conflicts tolerated before an upsert reports `Conflict`.
pub const MAX_CONTENTION_RETRIES: u32 = 32;

/// Tunables for [`ScoreStore`].
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Bound applied to every storage call.
    pub op_timeout: Duration,
    /// Rounds that may lose a uniqueness race. Never below 1.
    pub max_attempts: u32,
    /// Rounds that may be aborted by an engine write conflict.
    pub max_contention_retries: u32,
    /// Base of the exponential backoff between rounds.
    pub retry_backoff: Duration,
    /// Ceiling of the backoff window.
    pub max_backoff: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            op_timeout: DEFAULT_OP_TIMEOUT,
            max_attempts: MAX_UPSERT_ATTEMPTS,
            max_contention_retries: MAX_CONTENTION_RETRIES,
            retry_backoff: Duration::from_millis(2),
            max_backoff: Duration::from_millis(50),
        }
    }
}

impl StoreOptions {
    pub fn with_op_timeout(mut self, op_timeout: Duration) -> Self {
        self.op_timeout = op_timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_max_contention_retries(mut self, retries: u32) -> Self {
        self.max_contention_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Upper end of the pause before round `round + 1`.
    fn backoff_window(&self, round: u32) -> Duration {
        let factor = 2u32.saturating_pow(round.saturating_sub(1).min(16));
        self.retry_backoff.saturating_mul(factor).min(self.max_backoff)
    }

    /// Full jitter: uniform in `0..=backoff_window(round)`, so writers that
    /// collided do not wake up together.
    fn jittered_backoff(&self, round: u32) -> Duration {
        let window = u64::try_from(self.backoff_window(round).as_micros()).unwrap_or(u64::MAX);
        Duration::from_micros(rand::thread_rng().gen_range(0..=window))
    }
}

/// Outcome of one check-then-act round.
enum Attempt {
    Committed { player: PlayerScore, created: bool },
    /// Lost a uniqueness race, or the row vanished between lookup and update.
    Raced(String),
    /// Aborted by the engine; nothing was written.
    Busy(String),
}

/// The only write path to the `players` table.
#[derive(Clone)]
pub struct ScoreStore {
    backend: Arc<dyn ScoreWriter>,
    options: StoreOptions,
    deadline: Deadline,
}

impl ScoreStore {
    pub fn new(backend: Arc<dyn ScoreWriter>) -> Self {
        Self::with_options(backend, StoreOptions::default())
    }

    pub fn with_options(backend: Arc<dyn ScoreWriter>, mut options: StoreOptions) -> Self {
        options.max_attempts = options.max_attempts.max(1);
        Self {
            backend,
            options,
            deadline: Deadline::new(options.op_timeout),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Validate a raw client submission, then upsert it.
    pub async fn submit(&self, submission: &ScoreSubmission) -> Result<PlayerScore> {
        let (name, score) = submission.validate().inspect_err(|e| obs::emit_request_rejected(e))?;
        self.upsert(name, score).await
    }

    /// Create the record for `name`, or replace its score if it exists.
    ///
    /// On success exactly one record for `name` exists and carries `score`
    /// (or a later writer's score, if one committed after this call).
    #[instrument(skip(self))]
    pub async fn upsert(&self, name: &str, score: i64) -> Result<PlayerScore> {
        validate_name(name).inspect_err(|e| obs::emit_request_rejected(e))?;

        let (mut raced, mut busy) = (0u32, 0u32);
        loop {
            let reason = match self.attempt(name, score).await? {
                Attempt::Committed { player, created } => {
                    obs::emit_score_upserted(&player.name, player.score, created, raced + busy + 1);
                    return Ok(player);
                }
                Attempt::Raced(reason) => {
                    raced += 1;
                    reason
                }
                Attempt::Busy(reason) => {
                    busy += 1;
                    reason
                }
            };

            let rounds = raced + busy;
            obs::emit_upsert_retry(name, rounds, &reason);
            if raced >= self.options.max_attempts || busy > self.options.max_contention_retries {
                return Err(LeaderboardError::Conflict {
                    name: name.to_string(),
                    attempts: rounds,
                });
            }
            tokio::time::sleep(self.options.jittered_backoff(rounds)).await;
        }
    }

    async fn attempt(&self, name: &str, score: i64) -> Result<Attempt> {
        let existing = match self
            .deadline
            .run("find_by_name", self.backend.find_by_name(name))
            .await?
        {
            Ok(found) => found,
            Err(err) => return contended_or_fail(err),
        };

        let created = existing.is_none();
        let written = if created {
            debug!("no record yet, inserting");
            self.deadline
                .run("insert", self.backend.insert(name, score))
                .await?
                .map(Some)
        } else {
            debug!("record exists, updating in place");
            self.deadline
                .run("update_score", self.backend.update_score(name, score))
                .await?
        };

        match written {
            Ok(Some(player)) => Ok(Attempt::Committed { player, created }),
            Ok(None) => Ok(Attempt::Raced(
                "record disappeared between lookup and update".to_string(),
            )),
            Err(err) => contended_or_fail(err),
        }
    }
}

fn contended_or_fail(err: StorageError) -> Result<Attempt> {
    match err {
        StorageError::DuplicateName { .. } => Ok(Attempt::Raced(err.to_string())),
        StorageError::WriteConflict(_) => Ok(Attempt::Busy(err.to_string())),
        other => Err(other.into()),
    }
}
