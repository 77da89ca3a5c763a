//! HTTP handlers for ranked phrases and pipeline triggers
//!
//! - GET  /api/v1/faqs               - published phrases, count descending
//! - POST /api/v1/analytics/run      - run the pipeline now
//! - GET  /api/v1/analytics/last     - most recent run outcome

use super::pipeline::Pipeline;
use super::types::{RankedPhrase, RunStatus};
use crate::error::{ApiError, Result};
use crate::storage::PhraseStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for analytics handlers
#[derive(Clone)]
pub struct AnalyticsState {
    pub pipeline: Arc<Pipeline>,
    pub phrases: Arc<dyn PhraseStore>,
}

/// Create the analytics router
pub fn analytics_router(state: AnalyticsState) -> Router {
    Router::new()
        .route("/api/v1/faqs", get(list_faqs))
        .route("/api/v1/analytics/run", post(run_pipeline))
        .route("/api/v1/analytics/last", get(last_outcome))
        .with_state(state)
}

/// Every published phrase, highest count first (ties by phrase)
pub async fn ranked_phrases(store: &dyn PhraseStore) -> Result<Vec<RankedPhrase>> {
    let mut phrases = store.list().await?;
    phrases.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.phrase.cmp(&b.phrase)));
    Ok(phrases)
}

/// GET /api/v1/faqs
async fn list_faqs(State(state): State<AnalyticsState>) -> impl IntoResponse {
    match ranked_phrases(state.phrases.as_ref()).await {
        Ok(phrases) => (StatusCode::OK, Json(serde_json::json!(phrases))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list ranked phrases");
            (e.status_code(), Json(serde_json::json!(ApiError::from(&e))))
        }
    }
}

/// POST /api/v1/analytics/run
async fn run_pipeline(State(state): State<AnalyticsState>) -> impl IntoResponse {
    let outcome = state.pipeline.run().await;
    let status = match outcome.status {
        RunStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
        RunStatus::Ok | RunStatus::NoOp => StatusCode::OK,
    };
    (status, Json(outcome))
}

/// GET /api/v1/analytics/last
async fn last_outcome(State(state): State<AnalyticsState>) -> impl IntoResponse {
    match state.pipeline.last_outcome().await {
        Some(outcome) => (StatusCode::OK, Json(serde_json::json!(outcome))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!(ApiError {
                error: "No analytics run has completed yet".to_string(),
            })),
        ),
    }
}
