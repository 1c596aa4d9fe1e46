//! Centralised tracing initialisation for leaderboard binaries.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber with an `EnvFilter` and optional JSON formatting.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// * `json`: when `true`, emit newline-delimited JSON log lines.
/// * `level`: default verbosity when `RUST_LOG` is not set.
///
/// Only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(false, Level::DEBUG);
        init_tracing(true, Level::INFO);
        tracing::info!("still logging");
    }
}
