//! Behavioral contract of `RankingQuery::top_k`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leaderboard_core::{ErrorKind, PlayerScore, RankingQuery, ScoreStore, DEFAULT_TOP_K};
use score_state::fakes::MemoryScoreStore;
use score_state::{PlayerId, ScoreReader, StorageResult, SurrealScoreStore};

fn memory() -> (ScoreStore, RankingQuery) {
    let backend = Arc::new(MemoryScoreStore::new());
    (ScoreStore::new(backend.clone()), RankingQuery::new(backend))
}

async fn surreal() -> (ScoreStore, RankingQuery) {
    let backend = Arc::new(SurrealScoreStore::in_memory().await.unwrap());
    (ScoreStore::new(backend.clone()), RankingQuery::new(backend))
}

fn names(players: &[PlayerScore]) -> Vec<&str> {
    players.iter().map(|p| p.name.as_str()).collect()
}

// ===========================================================================
// Properties
// ===========================================================================

async fn orders_by_score_descending(store: ScoreStore, ranking: RankingQuery) {
    for (name, score) in [("a", 3), ("b", 9), ("c", 5)] {
        store.upsert(name, score).await.unwrap();
    }

    let top = ranking.top_k(Some(2)).await.unwrap();

    assert_eq!(names(&top), vec!["b", "c"]);
    assert_eq!(top[0].score, 9);
    assert_eq!(top[1].score, 5);
}

async fn bounds_the_window(store: ScoreStore, ranking: RankingQuery) {
    for i in 0..15 {
        store.upsert(&format!("p{i:02}"), i * 10).await.unwrap();
    }

    let top = ranking.top_k(Some(10)).await.unwrap();

    assert_eq!(top.len(), 10);
    let scores: Vec<i64> = top.iter().map(|p| p.score).collect();
    assert_eq!(scores, vec![140, 130, 120, 110, 100, 90, 80, 70, 60, 50]);
}

async fn defaults_to_ten(store: ScoreStore, ranking: RankingQuery) {
    for i in 0..12 {
        store.upsert(&format!("p{i}"), i).await.unwrap();
    }

    assert_eq!(ranking.top_k(None).await.unwrap().len(), DEFAULT_TOP_K);
}

async fn repeated_reads_are_identical(store: ScoreStore, ranking: RankingQuery) {
    for name in ["x", "y", "z", "w"] {
        store.upsert(name, 7).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    store.upsert("v", 8).await.unwrap();

    let first = ranking.top_k(Some(5)).await.unwrap();
    let second = ranking.top_k(Some(5)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].name, "v");
}

async fn reflects_updates(store: ScoreStore, ranking: RankingQuery) {
    store.upsert("low", 1).await.unwrap();
    store.upsert("high", 50).await.unwrap();
    store.upsert("low", 100).await.unwrap();

    let top = ranking.top_k(Some(2)).await.unwrap();
    assert_eq!(names(&top), vec!["low", "high"]);
}

async fn rejects_out_of_range_bounds(ranking: RankingQuery) {
    let err = ranking.top_k(Some(0)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ranking.top_k(Some(1_000)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

// ===========================================================================
// MemoryScoreStore
// ===========================================================================

#[tokio::test]
async fn memory_orders_by_score_descending() {
    let (store, ranking) = memory();
    orders_by_score_descending(store, ranking).await;
}

#[tokio::test]
async fn memory_bounds_the_window() {
    let (store, ranking) = memory();
    bounds_the_window(store, ranking).await;
}

#[tokio::test]
async fn memory_defaults_to_ten() {
    let (store, ranking) = memory();
    defaults_to_ten(store, ranking).await;
}

#[tokio::test]
async fn memory_repeated_reads_are_identical() {
    let (store, ranking) = memory();
    repeated_reads_are_identical(store, ranking).await;
}

#[tokio::test]
async fn memory_reflects_updates() {
    let (store, ranking) = memory();
    reflects_updates(store, ranking).await;
}

#[tokio::test]
async fn memory_rejects_out_of_range_bounds() {
    let (_, ranking) = memory();
    rejects_out_of_range_bounds(ranking).await;
}

// ===========================================================================
// SurrealScoreStore
// ===========================================================================

#[tokio::test]
async fn surreal_orders_by_score_descending() {
    let (store, ranking) = surreal().await;
    orders_by_score_descending(store, ranking).await;
}

#[tokio::test]
async fn surreal_bounds_the_window() {
    let (store, ranking) = surreal().await;
    bounds_the_window(store, ranking).await;
}

#[tokio::test]
async fn surreal_defaults_to_ten() {
    let (store, ranking) = surreal().await;
    defaults_to_ten(store, ranking).await;
}

#[tokio::test]
async fn surreal_repeated_reads_are_identical() {
    let (store, ranking) = surreal().await;
    repeated_reads_are_identical(store, ranking).await;
}

#[tokio::test]
async fn surreal_reflects_updates() {
    let (store, ranking) = surreal().await;
    reflects_updates(store, ranking).await;
}

#[tokio::test]
async fn surreal_rejects_out_of_range_bounds() {
    let (_, ranking) = surreal().await;
    rejects_out_of_range_bounds(ranking).await;
}

// ===========================================================================
// Misbehaving readers
// ===========================================================================

/// Returns the same row twice, as a broken backend might.
struct Duplicating;

#[async_trait]
impl ScoreReader for Duplicating {
    async fn find_by_name(&self, _name: &str) -> StorageResult<Option<PlayerScore>> {
        Ok(None)
    }

    async fn top(&self, _limit: usize) -> StorageResult<Vec<PlayerScore>> {
        let row = PlayerScore {
            id: PlayerId::new("1"),
            name: "twin".to_string(),
            score: 1,
            created_at: Default::default(),
        };
        Ok(vec![row.clone(), row])
    }
}

#[tokio::test]
async fn duplicated_rows_are_never_served() {
    let ranking = RankingQuery::new(Arc::new(Duplicating));

    let err = ranking.top_k(Some(5)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
}

#[tokio::test]
async fn empty_store_serves_empty_window() {
    let (_, ranking) = memory();
    assert!(ranking.top_k(None).await.unwrap().is_empty());
}
