//! HTTP surface: `GET /users`, `POST /users`, `GET /health`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use leaderboard_core::{
    ErrorKind, LeaderboardError, PlayerScore, RankingQuery, ScoreStore, ScoreSubmission,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub scores: ScoreStore,
    pub ranking: RankingQuery,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(list_users).post(submit_score))
        .with_state(state)
        .layer(cors())
        .layer(TraceLayer::new_for_http())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<Json<Vec<PlayerScore>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let players = state.ranking.top_k(query.limit).await?;
    Ok(Json(players))
}

pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreSubmission>, JsonRejection>,
) -> Result<Json<PlayerScore>, ApiError> {
    let Json(submission) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let player = state.scores.submit(&submission).await?;
    Ok(Json(player))
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    retry_after: Option<u64>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            retry_after: None,
        }
    }

    fn unavailable(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
            retry_after,
        }
    }
}

impl From<LeaderboardError> for ApiError {
    fn from(err: LeaderboardError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput => ApiError::bad_request(err.to_string()),
            ErrorKind::Conflict => ApiError::unavailable(err.to_string(), Some(1)),
            ErrorKind::StoreUnavailable => ApiError::unavailable(err.to_string(), None),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, message = %self.message, "leaderboard request failed");
        let mut response = (self.status, Json(json!({"error": self.message}))).into_response();
        if let Some(secs) = self.retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
