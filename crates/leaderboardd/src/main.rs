//! leaderboardd - HTTP daemon for the leaderboard
//!
//! Serves the top scores and accepts score submissions. Storage is chosen
//! from the environment (SurrealDB Cloud, `SURREALDB_URL`, or in-memory).

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use leaderboard_core::{
    RankingQuery, ScoreStore, StoreOptions, MAX_CONTENTION_RETRIES, MAX_UPSERT_ATTEMPTS,
};
use score_state::SurrealScoreStore;
use tracing::{info, Level};

use crate::routes::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "leaderboardd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Leaderboard HTTP daemon", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "LEADERBOARD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Upper bound for a single storage call, in milliseconds
    #[arg(long, env = "LEADERBOARD_OP_TIMEOUT_MS", default_value_t = 5000)]
    op_timeout_ms: u64,

    /// Check-then-act rounds before a contended upsert gives up
    #[arg(long, env = "LEADERBOARD_MAX_ATTEMPTS", default_value_t = MAX_UPSERT_ATTEMPTS)]
    max_attempts: u32,

    /// Transaction conflicts tolerated before an upsert gives up
    #[arg(
        long,
        env = "LEADERBOARD_MAX_CONTENTION_RETRIES",
        default_value_t = MAX_CONTENTION_RETRIES
    )]
    max_contention_retries: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    fn store_options(&self) -> StoreOptions {
        StoreOptions::default()
            .with_op_timeout(Duration::from_millis(self.op_timeout_ms))
            .with_max_attempts(self.max_attempts)
            .with_max_contention_retries(self.max_contention_retries)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    leaderboard_core::init_tracing(cli.json, level);

    let backend = Arc::new(
        SurrealScoreStore::from_env()
            .await
            .context("Failed to connect to leaderboard database")?,
    );
    let options = cli.store_options();
    let state = AppState {
        scores: ScoreStore::with_options(backend.clone(), options),
        ranking: RankingQuery::with_timeout(backend, options.op_timeout),
    };

    let bind_addr = cli.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(
        %bind_addr,
        op_timeout_ms = cli.op_timeout_ms,
        max_attempts = options.max_attempts,
        max_contention_retries = options.max_contention_retries,
        "leaderboardd listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("leaderboardd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
