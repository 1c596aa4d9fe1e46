//! Input validation, applied before any storage access.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LeaderboardError;
use crate::Result;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Top-K bound used when the caller supplies none.
pub const DEFAULT_TOP_K: usize = 10;

/// Largest top-K window a caller may ask for.
pub const MAX_TOP_K: usize = 100;

/// Score submission as it arrives from a client payload.
///
/// Both fields are optional at the wire level so that missing values are
/// reported as `InvalidInput` instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub score: Option<Value>,
}

impl ScoreSubmission {
    pub fn new(user_name: impl Into<String>, score: impl Into<Value>) -> Self {
        Self {
            user_name: Some(user_name.into()),
            score: Some(score.into()),
        }
    }

    /// Check both fields and return the validated `(name, score)` pair.
    pub fn validate(&self) -> Result<(&str, i64)> {
        let name = self
            .user_name
            .as_deref()
            .ok_or_else(|| LeaderboardError::invalid("userName is required"))?;
        validate_name(name)?;
        let score = self
            .score
            .as_ref()
            .ok_or_else(|| LeaderboardError::invalid("score is required"))?;
        Ok((name, parse_score(score)?))
    }
}

/// Names are matched exactly, so only emptiness and length are checked.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LeaderboardError::invalid("userName must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LeaderboardError::invalid(format!(
            "userName must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Parse a client-supplied score into an integer.
///
/// Accepts JSON integers, integral floats, and strings holding either.
/// Fractional, non-finite, out-of-range, blank and non-numeric values are
/// rejected.
pub fn parse_score(raw: &Value) -> Result<i64> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                integral(f).ok_or_else(|| not_an_integer(raw))
            } else {
                Err(not_an_integer(raw))
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(LeaderboardError::invalid("score must not be blank"));
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| not_an_integer(raw))
        }
        _ => Err(not_an_integer(raw)),
    }
}

/// Resolve the requested window size, applying the default.
pub fn resolve_top_k(k: Option<usize>) -> Result<usize> {
    let k = k.unwrap_or(DEFAULT_TOP_K);
    if k == 0 || k > MAX_TOP_K {
        return Err(LeaderboardError::invalid(format!(
            "limit must be between 1 and {}",
            MAX_TOP_K
        )));
    }
    Ok(k)
}

fn integral(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; i64::MAX is not.
    const UPPER: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && f >= -UPPER && f < UPPER {
        Some(f as i64)
    } else {
        None
    }
}

fn not_an_integer(raw: &Value) -> LeaderboardError {
    LeaderboardError::invalid(format!("score must be an integer, got {}", raw))
}
