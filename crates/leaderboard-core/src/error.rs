//! Error taxonomy reported to callers of the score store and ranking query.

use score_state::StorageError;
use thiserror::Error;

/// Coarse classification used by boundary layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad name, bad score or bad bound. Never retried.
    InvalidInput,
    /// A same-name race, or engine write contention, outlasted the retry
    /// budget.
    Conflict,
    /// The store could not be reached, failed, or timed out.
    StoreUnavailable,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("upsert for {name:?} still contended after {attempts} attempts")]
    Conflict { name: String, attempts: u32 },

    #[error("score store unavailable: {0}")]
    StoreUnavailable(String),
}

impl LeaderboardError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        LeaderboardError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LeaderboardError::InvalidInput { .. } => ErrorKind::InvalidInput,
            LeaderboardError::Conflict { .. } => ErrorKind::Conflict,
            LeaderboardError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }

    /// Whether the same request may succeed if sent again later.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::InvalidInput)
    }
}

/// Storage errors that reach a caller are infrastructure faults. Same-name
/// races are absorbed by the upsert retry loop and surface as `Conflict`.
impl From<StorageError> for LeaderboardError {
    fn from(err: StorageError) -> Self {
        LeaderboardError::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_and_retryability() {
        let invalid = LeaderboardError::invalid("name must not be empty");
        assert_eq!(invalid.kind(), ErrorKind::InvalidInput);
        assert!(!invalid.is_retryable());

        let conflict = LeaderboardError::Conflict {
            name: "carol".to_string(),
            attempts: 3,
        };
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
        assert!(conflict.is_retryable());

        let down = LeaderboardError::StoreUnavailable("connection refused".to_string());
        assert_eq!(down.kind(), ErrorKind::StoreUnavailable);
        assert!(down.is_retryable());
    }

    #[test]
    fn test_storage_errors_map_to_store_unavailable() {
        let err: LeaderboardError = StorageError::Backend("socket closed".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        let err: LeaderboardError = StorageError::Corrupt("empty name".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);

        let err: LeaderboardError = StorageError::DuplicateName {
            name: "carol".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(err.to_string().contains("carol"), "{err}");
    }
}
