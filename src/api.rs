//! Unified API router for FAQ Updater
//!
//! Merges the module routers into a single axum `Router` with CORS and
//! request tracing.
//!
//! ## Endpoint Map
//!
//! | Route                          | Module    | Description                      |
//! |--------------------------------|-----------|----------------------------------|
//! | `GET /health`                  | api       | Liveness probe                   |
//! | `POST /api/v1/messages`        | messages  | Ingest one inbound message       |
//! | `GET /api/v1/faqs`             | analytics | Ranked phrases, count descending |
//! | `POST /api/v1/analytics/run`   | analytics | Run the pipeline now             |
//! | `GET /api/v1/analytics/last`   | analytics | Most recent run outcome          |

use crate::analytics::{analytics_router, AnalyticsState, Pipeline};
use crate::messages::{messages_router, MessagesState};
use crate::storage::{MessageStore, PhraseStore};
use axum::{
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete HTTP application
pub fn build_app(
    messages: Arc<dyn MessageStore>,
    phrases: Arc<dyn PhraseStore>,
    pipeline: Arc<Pipeline>,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(messages_router(MessagesState { store: messages }))
        .merge(analytics_router(AnalyticsState { pipeline, phrases }))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// CORS layer: any origin when the list is empty, otherwise the listed ones
fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(parsed)
}
