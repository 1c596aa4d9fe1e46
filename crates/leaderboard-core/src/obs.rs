//! Structured observability hooks for score writes and ranking reads.
//!
//! Events are emitted at `info!` level, timeouts and retries at `warn!`.
//! Filtering follows `RUST_LOG`; see [`crate::init_tracing`].

use tracing::{info, warn};

/// Emit event: a score was committed.
///
/// ```ignore
/// emit_score_upserted("alice", 10, true, 1);
/// // logs: event=score.upserted name=alice score=10 created=true attempts=1
/// ```
pub fn emit_score_upserted(name: &str, score: i64, created: bool, attempts: u32) {
    info!(
        event = "score.upserted",
        name = %name,
        score = score,
        created = created,
        attempts = attempts,
    );
}

/// Emit event: an upsert attempt lost a race and will be re-run.
pub fn emit_upsert_retry(name: &str, attempt: u32, reason: &str) {
    warn!(event = "score.upsert_retry", name = %name, attempt = attempt, reason = %reason);
}

/// Emit event: a request was rejected before touching storage.
pub fn emit_request_rejected(reason: &dyn std::fmt::Display) {
    info!(event = "request.rejected", reason = %reason);
}

/// Emit event: a ranking window was served.
pub fn emit_ranking_served(k: usize, returned: usize) {
    info!(event = "ranking.served", k = k, returned = returned);
}

/// Emit event: a storage call ran past its deadline.
pub fn emit_store_timeout(op: &str, after_ms: u64) {
    warn!(event = "store.timeout", op = %op, after_ms = after_ms);
}
